//! Configuration types for taskrank
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! default_strategy = "deadline"
//! suggest_limit = 5
//! require_ids = true
//!
//! [profiles.smart]
//! urgency = 0.30
//! importance = 0.30
//! dependency = 0.20
//! effort = 0.20
//! ```

use crate::profile::{Profile, Profiles, Strategy, Weights};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of tasks returned by `suggest` when not configured.
pub const DEFAULT_SUGGEST_LIMIT: usize = 3;

/// Main configuration structure for taskrank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Strategy used when none is requested
    pub default_strategy: Strategy,

    /// How many actionable tasks `suggest` returns
    pub suggest_limit: usize,

    /// Whether every record must carry an id
    pub require_ids: bool,

    /// Weight overrides keyed by strategy name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Weights>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::default(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
            require_ids: true,
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    ///
    /// Weight overrides are checked eagerly so a bad file fails at load time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TomlParse`] for malformed TOML or unknown keys,
    /// [`Error::UnknownStrategy`] for overrides of unknown strategies, and
    /// [`Error::InvalidWeights`] for overrides that fail validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.profiles()?;
        tracing::debug!(
            default_strategy = %config.default_strategy,
            overrides = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The built-in profiles with this configuration's overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStrategy`] or [`Error::InvalidWeights`] for a
    /// bad override.
    pub fn profiles(&self) -> Result<Profiles> {
        self.profiles
            .iter()
            .try_fold(Profiles::builtin(), |profiles, (name, weights)| {
                let strategy: Strategy = name.parse()?;
                profiles.with_override(strategy, *weights)
            })
    }

    /// The profile for `strategy`, or for the default strategy if `None`.
    ///
    /// # Errors
    ///
    /// See [`Config::profiles`].
    pub fn profile(&self, strategy: Option<Strategy>) -> Result<Profile> {
        Ok(self
            .profiles()?
            .get(strategy.unwrap_or(self.default_strategy)))
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}
