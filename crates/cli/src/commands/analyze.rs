use super::RankRequest;
use taskrank_core::{Analysis, Config, analyze};
use tracing::instrument;

/// Rank every task in the input and render the [`Analysis`] as JSON.
#[instrument(skip_all)]
pub fn execute_analyze(request: &RankRequest, config: &Config) -> miette::Result<String> {
    let analysis = run(request, config)?;
    Ok(request.render(&analysis)?)
}

pub(super) fn run(request: &RankRequest, config: &Config) -> miette::Result<Analysis> {
    let options = request.options(config)?;
    let records = request.read_input()?;
    Ok(analyze(&records, &options)?)
}
