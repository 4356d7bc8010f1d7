//! Weight profiles for the scoring strategies.
//!
//! A [`Profile`] pairs a [`Strategy`] with the [`Weights`] used to combine
//! sub-scores into a composite. The strategy also decides which metric
//! orders tasks of equal depth. [`Profiles`] maps every strategy to its
//! weights and accepts validated overrides from configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Tolerance used when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Named scoring strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Balanced blend, ranked by composite score (default)
    #[default]
    Smart,
    /// Favour low-effort tasks, ranked by effort score
    Fastest,
    /// Favour important tasks, ranked by importance score
    Impact,
    /// Favour close deadlines, ranked by urgency score
    Deadline,
}

impl Strategy {
    /// Every strategy, in a stable order.
    pub const ALL: [Self; 4] = [Self::Smart, Self::Fastest, Self::Impact, Self::Deadline];

    /// Get the string representation used in configuration and on the CLI.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::Fastest => "fastest",
            Self::Impact => "impact",
            Self::Deadline => "deadline",
        }
    }

    /// The built-in weights for this strategy.
    #[must_use]
    pub const fn builtin_weights(self) -> Weights {
        match self {
            Self::Smart => Weights::new(0.40, 0.25, 0.20, 0.15),
            Self::Fastest => Weights::new(0.20, 0.15, 0.10, 0.55),
            Self::Impact => Weights::new(0.15, 0.50, 0.25, 0.10),
            Self::Deadline => Weights::new(0.55, 0.20, 0.15, 0.10),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| Error::unknown_strategy(s))
    }
}

/// Relative influence of each sub-score on the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Weight of the deadline-driven urgency score
    pub urgency: f64,
    /// Weight of the importance score
    pub importance: f64,
    /// Weight of the fan-in dependency score
    pub dependency: f64,
    /// Weight of the effort score
    pub effort: f64,
}

impl Weights {
    /// Create a weight set, in urgency, importance, dependency, effort order.
    #[must_use]
    pub const fn new(urgency: f64, importance: f64, dependency: f64, effort: f64) -> Self {
        Self {
            urgency,
            importance,
            dependency,
            effort,
        }
    }

    /// Sum of all four weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.dependency + self.effort
    }

    /// Check that every weight lies in [0, 1] and that they sum to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeights`] naming `strategy` otherwise.
    pub fn validate(&self, strategy: Strategy) -> Result<()> {
        let fields = [
            ("urgency", self.urgency),
            ("importance", self.importance),
            ("dependency", self.dependency),
            ("effort", self.effort),
        ];
        if let Some((name, value)) = fields
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            return Err(Error::invalid_weights(
                strategy,
                format!("{name} weight {value} is outside [0, 1]"),
            ));
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::invalid_weights(
                strategy,
                format!("weights sum to {total}, expected 1.0"),
            ));
        }
        Ok(())
    }
}

/// A strategy together with the weights it scores with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// Strategy deciding the secondary ranking metric
    pub strategy: Strategy,
    /// Weights for the composite score
    pub weights: Weights,
}

impl Profile {
    /// The profile with built-in weights for `strategy`.
    #[must_use]
    pub const fn builtin(strategy: Strategy) -> Self {
        Self {
            strategy,
            weights: strategy.builtin_weights(),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::builtin(Strategy::default())
    }
}

/// Mapping from every strategy to its weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Profiles {
    table: HashMap<Strategy, Weights>,
}

impl Profiles {
    /// The built-in weight table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            table: Strategy::ALL
                .into_iter()
                .map(|strategy| (strategy, strategy.builtin_weights()))
                .collect(),
        }
    }

    /// Replace the weights of one strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeights`] if `weights` fail validation.
    pub fn with_override(mut self, strategy: Strategy, weights: Weights) -> Result<Self> {
        weights.validate(strategy)?;
        self.table.insert(strategy, weights);
        Ok(self)
    }

    /// The profile for `strategy`.
    #[must_use]
    pub fn get(&self, strategy: Strategy) -> Profile {
        let weights = self
            .table
            .get(&strategy)
            .copied()
            .unwrap_or_else(|| strategy.builtin_weights());
        Profile { strategy, weights }
    }

    /// Look up a profile by strategy name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStrategy`] for names outside the known set.
    pub fn resolve(&self, name: &str) -> Result<Profile> {
        Ok(self.get(name.parse()?))
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::builtin()
    }
}
