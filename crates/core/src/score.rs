//! Priority scoring and ranking.
//!
//! Each task gets four sub-scores in `[0, 1]`:
//!
//! | Factor     | Source                                  |
//! |------------|-----------------------------------------|
//! | urgency    | days until the due date                 |
//! | importance | `importance / 10`                       |
//! | effort     | estimated hours, shorter is higher      |
//! | dependency | how many tasks wait on this one         |
//!
//! The composite is the profile-weighted sum of the sub-scores, scaled by
//! [`BLOCKED_PENALTY`] when the task itself waits on others. Results are
//! ordered by depth first, so nothing is ranked ahead of a task it depends
//! on, then by the metric the strategy favours.

use crate::profile::{Profile, Strategy, Weights};
use crate::task::{Task, TaskId};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use taskrank_graph::{DepthMemo, TaskGraph};
use tracing::{debug, instrument};

/// Multiplier applied to the composite of a task with dependencies.
pub const BLOCKED_PENALTY: f64 = 0.4;

/// Composite score at or above which a task is [`Indicator::High`].
pub const HIGH_PRIORITY_THRESHOLD: f64 = 0.75;

/// Composite score at or above which a task is [`Indicator::Medium`].
pub const MEDIUM_PRIORITY_THRESHOLD: f64 = 0.40;

/// Urgency of a task from its due date relative to `today`.
#[must_use]
pub fn urgency_score(due_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due_date) = due_date else {
        return 0.05;
    };
    match (due_date - today).num_days() {
        days if days < 0 => 1.00,
        0 => 0.95,
        1 => 0.85,
        2..=3 => 0.65,
        4..=7 => 0.40,
        8..=14 => 0.20,
        _ => 0.10,
    }
}

/// Importance on a 0-1 scale.
#[must_use]
pub fn importance_score(importance: u8) -> f64 {
    f64::from(importance) / 10.0
}

/// Effort score; quicker tasks score higher.
#[must_use]
pub fn effort_score(estimated_hours: u64) -> f64 {
    match estimated_hours {
        0..=1 => 1.00,
        2..=4 => 0.70,
        5..=8 => 0.40,
        _ => 0.20,
    }
}

/// Dependency score from the number of tasks waiting on this one.
#[must_use]
pub fn dependency_score(fan_in: usize) -> f64 {
    match fan_in {
        0 => 0.0,
        1 => 0.4,
        2 => 0.7,
        _ => 1.0,
    }
}

/// The four normalized sub-scores of a task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// Deadline pressure
    #[serde(rename = "urgency_score")]
    pub urgency: f64,
    /// Stated importance
    #[serde(rename = "importance_score")]
    pub importance: f64,
    /// Inverse of effort
    #[serde(rename = "effort_score")]
    pub effort: f64,
    /// Fan-in
    #[serde(rename = "dependency_score")]
    pub dependency: f64,
}

impl SubScores {
    /// Weighted sum of the sub-scores, before any penalty.
    #[must_use]
    pub fn weighted(&self, weights: &Weights) -> f64 {
        self.urgency * weights.urgency
            + self.importance * weights.importance
            + self.dependency * weights.dependency
            + self.effort * weights.effort
    }
}

/// Coarse priority band of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    /// Composite of at least 0.75
    High,
    /// Composite of at least 0.40
    Medium,
    /// Anything lower
    Low,
}

impl Indicator {
    /// Band for a full-precision composite score.
    #[must_use]
    pub fn from_score(composite: f64) -> Self {
        if composite >= HIGH_PRIORITY_THRESHOLD {
            Self::High
        } else if composite >= MEDIUM_PRIORITY_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A task with its computed priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    /// Task id, when the record had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Task title
    pub title: String,
    /// Optional deadline
    pub due_date: Option<NaiveDate>,
    /// Estimated hours
    pub effort: u64,
    /// Importance from 1 to 10
    pub importance: u8,
    /// Sub-scores
    #[serde(flatten)]
    pub sub_scores: SubScores,
    /// Full-precision composite, used for every comparison
    #[serde(skip)]
    pub composite: f64,
    /// Composite rounded to two decimals for display
    pub priority_score: f64,
    /// Priority band of the composite
    pub priority_indicator: Indicator,
    /// Longest dependency chain below this task
    pub depth: usize,
    /// Human-readable explanations, in a fixed order
    pub reasons: Vec<String>,
}

impl Strategy {
    /// The value that orders tasks of equal depth; higher ranks first.
    #[must_use]
    pub fn ranking_metric(self, scored: &ScoredTask) -> f64 {
        match self {
            Self::Smart => scored.composite,
            Self::Fastest => scored.sub_scores.effort,
            Self::Impact => scored.sub_scores.importance,
            Self::Deadline => scored.sub_scores.urgency,
        }
    }
}

/// Scores and ranks a validated, acyclic batch.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    profile: Profile,
    today: NaiveDate,
}

impl Scorer {
    /// Create a scorer that measures deadlines against the local date.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self::with_today(profile, Local::now().date_naive())
    }

    /// Create a scorer with an explicit current date.
    #[must_use]
    pub const fn with_today(profile: Profile, today: NaiveDate) -> Self {
        Self { profile, today }
    }

    /// Score every task and return them in rank order.
    ///
    /// `graph` must be built from `tasks` and have passed cycle detection.
    /// Depths are memoized for the duration of this call only.
    #[instrument(skip_all, fields(strategy = %self.profile.strategy, tasks = tasks.len()))]
    pub fn score(&self, tasks: &[Task], graph: &TaskGraph<TaskId>) -> Vec<ScoredTask> {
        let mut memo = DepthMemo::new();
        let mut scored: Vec<ScoredTask> = tasks
            .iter()
            .map(|task| self.score_task(task, graph, &mut memo))
            .collect();

        let strategy = self.profile.strategy;
        scored.sort_by(|a, b| {
            a.depth.cmp(&b.depth).then_with(|| {
                strategy
                    .ranking_metric(b)
                    .partial_cmp(&strategy.ranking_metric(a))
                    .unwrap_or(Ordering::Equal)
            })
        });

        debug!(ranked = scored.len(), "Scored task batch");
        scored
    }

    fn score_task(
        &self,
        task: &Task,
        graph: &TaskGraph<TaskId>,
        memo: &mut DepthMemo,
    ) -> ScoredTask {
        let fan_in = task.id.as_ref().map_or(0, |id| graph.fan_in(id));
        let sub_scores = SubScores {
            urgency: urgency_score(task.due_date, self.today),
            importance: importance_score(task.importance),
            effort: effort_score(task.estimated_hours),
            dependency: dependency_score(fan_in),
        };

        let mut composite = sub_scores.weighted(&self.profile.weights);
        if task.is_blocked() {
            composite *= BLOCKED_PENALTY;
        }

        ScoredTask {
            id: task.id.clone(),
            title: task.title.clone(),
            due_date: task.due_date,
            effort: task.estimated_hours,
            importance: task.importance,
            sub_scores,
            composite,
            priority_score: round_to_hundredths(composite),
            priority_indicator: Indicator::from_score(composite),
            depth: task_depth(task, graph, memo),
            reasons: reasons(task, &sub_scores),
        }
    }
}

/// Score and rank `tasks` against today's date.
///
/// See [`Scorer::score`].
#[must_use]
pub fn score(tasks: &[Task], graph: &TaskGraph<TaskId>, profile: &Profile) -> Vec<ScoredTask> {
    Scorer::new(*profile).score(tasks, graph)
}

fn task_depth(task: &Task, graph: &TaskGraph<TaskId>, memo: &mut DepthMemo) -> usize {
    match &task.id {
        Some(id) if graph.contains_task(id) => graph.depth(id, memo),
        // Tasks without a graph node sit one level above their deepest dependency
        _ => task
            .dependencies
            .iter()
            .map(|dep| graph.depth(dep, memo) + 1)
            .max()
            .unwrap_or(0),
    }
}

fn reasons(task: &Task, sub_scores: &SubScores) -> Vec<String> {
    let mut reasons = Vec::new();

    if sub_scores.urgency >= 0.85 {
        match task.due_date {
            Some(due_date) if sub_scores.urgency < 1.0 => {
                reasons.push(format!("Urgent deadline {due_date}"));
            }
            _ => reasons.push("Deadline crossed".to_string()),
        }
    }
    if sub_scores.importance >= 0.8 {
        reasons.push("High importance".to_string());
    }
    if sub_scores.effort >= 0.7 {
        reasons.push("Quick win".to_string());
    }
    if sub_scores.dependency >= 0.7 {
        reasons.push("Unblocks other tasks".to_string());
    }
    if task.is_blocked() {
        let blockers = task
            .dependencies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        reasons.push(format!("Currently blocked by task/s {blockers}"));
    }

    reasons
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
