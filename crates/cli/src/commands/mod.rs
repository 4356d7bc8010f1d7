pub mod analyze;
pub mod suggest;

use crate::errors::{CliError, CliResult};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use taskrank_core::{AnalyzeOptions, Config, Strategy};
use tracing::{debug, instrument};

/// Configuration file picked up from the working directory when no
/// `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskrank.toml";

#[derive(Debug, Clone)]
pub enum Command {
    Analyze(RankRequest),
    Suggest {
        request: RankRequest,
        limit: Option<usize>,
    },
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Analyze(_) => "analyze",
            Self::Suggest { .. } => "suggest",
        }
    }
}

/// What to rank and how, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RankRequest {
    pub strategy: Option<String>,
    pub input: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub allow_missing_ids: bool,
    pub pretty: bool,
}

impl RankRequest {
    /// Analyze options from this request layered over `config`.
    pub fn options(&self, config: &Config) -> miette::Result<AnalyzeOptions> {
        let strategy = self
            .strategy
            .as_deref()
            .map(str::parse::<Strategy>)
            .transpose()?;
        let profile = config.profile(strategy)?;

        Ok(AnalyzeOptions {
            profile,
            id_required: config.require_ids && !self.allow_missing_ids,
            today: self.today,
        })
    }

    /// Raw task records from the input file, or stdin.
    pub fn read_input(&self) -> CliResult<Value> {
        match &self.input {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| CliError::file_error("read", path, e))?;
                parse_json(&text, &path.display().to_string())
            }
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| CliError::StdinError { source })?;
                parse_json(&text, "stdin")
            }
        }
    }

    /// Render `output` as JSON, pretty-printed on request.
    pub fn render<T: Serialize>(&self, output: &T) -> CliResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(output)
        } else {
            serde_json::to_string(output)
        };
        rendered.map_err(|source| CliError::OutputError { source })
    }
}

fn parse_json(text: &str, origin: &str) -> CliResult<Value> {
    serde_json::from_str(text).map_err(|e| CliError::invalid_json(origin, e))
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
/// exists, or fall back to defaults.
///
/// An explicitly given path must exist.
#[instrument]
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                debug!("No configuration file, using defaults");
                return Ok(Config::default());
            }
            default
        }
    };

    let text =
        std::fs::read_to_string(&path).map_err(|e| CliError::file_error("read", &path, e))?;
    let config = Config::from_toml_str(&text).map_err(|source| CliError::ConfigError {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}
