use super::RankRequest;
use serde::Serialize;
use taskrank_core::{Config, ScoredTask, suggest};
use tracing::{debug, instrument};

/// Output of the suggest command.
#[derive(Debug, Serialize)]
pub struct Suggestions {
    pub suggested_tasks: Vec<ScoredTask>,
    pub warnings: Vec<String>,
}

/// Rank the input and render the first actionable tasks as JSON.
///
/// `limit` falls back to the configured `suggest_limit`.
#[instrument(skip(request, config))]
pub fn execute_suggest(
    request: &RankRequest,
    limit: Option<usize>,
    config: &Config,
) -> miette::Result<String> {
    let analysis = super::analyze::run(request, config)?;
    let limit = limit.unwrap_or(config.suggest_limit);

    let suggested_tasks = suggest(&analysis.ranked_tasks, limit);
    debug!(
        suggested = suggested_tasks.len(),
        ranked = analysis.ranked_tasks.len(),
        "Selected actionable tasks"
    );

    Ok(request.render(&Suggestions {
        suggested_tasks,
        warnings: analysis.warnings,
    })?)
}
