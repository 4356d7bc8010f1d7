//! The end-to-end ranking pipeline.
//!
//! [`analyze`] runs validation, graph construction, cycle detection and
//! scoring in that order, stopping at the first error.

use crate::Result;
use crate::profile::Profile;
use crate::score::{ScoredTask, Scorer};
use crate::task::{Task, TaskId};
use crate::validate::Validator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskrank_graph::TaskGraph;
use tracing::{debug, info, instrument};

/// Knobs for one [`analyze`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzeOptions {
    /// Profile to score with
    pub profile: Profile,
    /// Whether every record must carry an id
    pub id_required: bool,
    /// Current date for urgency and overdue checks; the local date if `None`
    pub today: Option<NaiveDate>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            id_required: true,
            today: None,
        }
    }
}

impl AnalyzeOptions {
    /// Options scoring with `profile`, ids required.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Pin the current date.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Set whether ids are required.
    #[must_use]
    pub const fn with_id_required(mut self, id_required: bool) -> Self {
        self.id_required = id_required;
        self
    }
}

/// Outcome of a successful [`analyze`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Tasks in rank order
    pub ranked_tasks: Vec<ScoredTask>,
    /// Validation warnings, in the order they were raised
    pub warnings: Vec<String>,
}

/// Build the dependency graph of a validated batch.
///
/// Dependencies on ids missing from the batch are left out of the graph.
#[must_use]
pub fn build_graph(tasks: &[Task]) -> TaskGraph<TaskId> {
    TaskGraph::from_tasks(tasks)
}

/// Accept either a bare array of records or an object with a `tasks` array.
///
/// Any other shape is returned unchanged so validation can report it.
#[must_use]
pub fn task_records(input: &Value) -> &Value {
    match input {
        Value::Object(fields) => fields.get("tasks").unwrap_or(input),
        _ => input,
    }
}

/// Validate, check and rank a batch of raw task records.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] for malformed records and
/// [`crate::Error::CycleDetected`] when dependencies form a cycle.
#[instrument(skip_all, fields(strategy = %options.profile.strategy))]
pub fn analyze(records: &Value, options: &AnalyzeOptions) -> Result<Analysis> {
    let mut validator = Validator::new(options.id_required);
    if let Some(today) = options.today {
        validator = validator.with_today(today);
    }
    let validated = validator.validate(task_records(records))?;

    let graph = build_graph(&validated.tasks);
    graph.detect_cycle()?;
    debug!(
        tasks = graph.task_count(),
        edges = graph.edge_count(),
        "Dependency graph is acyclic"
    );

    let scorer = match options.today {
        Some(today) => Scorer::with_today(options.profile, today),
        None => Scorer::new(options.profile),
    };
    let ranked_tasks = scorer.score(&validated.tasks, &graph);

    info!(
        ranked = ranked_tasks.len(),
        warnings = validated.warnings.len(),
        "Analysis complete"
    );
    Ok(Analysis {
        ranked_tasks,
        warnings: validated.warnings,
    })
}

/// The first `limit` ranked tasks that can be started now.
///
/// A task can be started when it sits at depth zero, i.e. waits on nothing
/// in the batch. Rank order is preserved.
#[must_use]
pub fn suggest(ranked: &[ScoredTask], limit: usize) -> Vec<ScoredTask> {
    ranked
        .iter()
        .filter(|task| task.depth == 0)
        .take(limit)
        .cloned()
        .collect()
}
