//! CLI error types with miette diagnostics
//!
//! Errors from the ranking pipeline itself are `taskrank_core::Error`
//! diagnostics and pass through unchanged; these cover what happens around
//! it: reading files, decoding JSON and writing results.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to {operation} {}", path.display())]
    #[diagnostic(
        code(taskrank::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read tasks from stdin")]
    #[diagnostic(code(taskrank::cli::stdin_error))]
    StdinError {
        #[source]
        source: std::io::Error,
    },

    #[error("Input from {origin} is not valid JSON")]
    #[diagnostic(
        code(taskrank::cli::invalid_json),
        help("Provide a JSON array of tasks or an object with a \"tasks\" array")
    )]
    InvalidJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration file {} is invalid", path.display())]
    #[diagnostic(code(taskrank::cli::config_error))]
    ConfigError {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: taskrank_core::Error,
    },

    #[error("Failed to serialize output")]
    #[diagnostic(code(taskrank::cli::output_error))]
    OutputError {
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    pub fn file_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileError {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn invalid_json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidJson {
            origin: origin.into(),
            source,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
