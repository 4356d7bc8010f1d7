use crate::commands::{Command, RankRequest};
use crate::tracing::{LogLevel, TracingFormat};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "taskrank")]
#[command(about = "Rank tasks by urgency, importance, effort and what they unblock")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        long,
        global = true,
        help = "Tracing filter directive, overriding --level and RUST_LOG (e.g. taskrank_core=debug)"
    )]
    pub log_filter: Option<String>,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = "TASKRANK_CONFIG",
        help = "Path to a TOML configuration file [default: ./taskrank.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Rank every task in the batch")]
    Analyze {
        #[command(flatten)]
        rank: RankArgs,
    },
    #[command(about = "Show the top tasks that can be started right now")]
    Suggest {
        #[command(flatten)]
        rank: RankArgs,
        #[arg(short = 'n', long, help = "Number of tasks to suggest [default: from config, 3]")]
        limit: Option<usize>,
    },
}

/// Arguments shared by every ranking command.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[arg(
        short = 's',
        long,
        help = "Scoring strategy: smart, fastest, impact or deadline [default: from config]"
    )]
    pub strategy: Option<String>,

    #[arg(short = 'i', long, help = "Read tasks from this JSON file instead of stdin")]
    pub input: Option<PathBuf>,

    #[arg(long, help = "Current date for deadline math, as YYYY-MM-DD [default: today]")]
    pub today: Option<NaiveDate>,

    #[arg(long, help = "Accept records without an id")]
    pub allow_missing_ids: bool,

    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,
}

impl From<RankArgs> for RankRequest {
    fn from(args: RankArgs) -> Self {
        Self {
            strategy: args.strategy,
            input: args.input,
            today: args.today,
            allow_missing_ids: args.allow_missing_ids,
            pretty: args.pretty,
        }
    }
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Analyze { rank } => Self::Analyze(rank.into()),
            Commands::Suggest { rank, limit } => Self::Suggest {
                request: rank.into(),
                limit,
            },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["taskrank", "analyze"]).unwrap();

        assert_eq!(cli.level, LogLevel::Warn);
        assert_eq!(cli.log_format, TracingFormat::Compact);
        let Commands::Analyze { rank } = cli.command else {
            panic!("expected analyze");
        };
        assert!(rank.strategy.is_none());
        assert!(rank.input.is_none());
        assert!(rank.today.is_none());
        assert!(!rank.allow_missing_ids);
        assert!(!rank.pretty);
    }

    #[test]
    fn test_cli_log_level_parsing() {
        let cli = Cli::try_parse_from(["taskrank", "--level", "debug", "analyze"]).unwrap();
        assert_eq!(cli.level, LogLevel::Debug);

        let cli = Cli::try_parse_from(["taskrank", "analyze", "-l", "error"]).unwrap();
        assert_eq!(cli.level, LogLevel::Error);

        assert!(Cli::try_parse_from(["taskrank", "--level", "loud", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_log_format_parsing() {
        let cli = Cli::try_parse_from(["taskrank", "--log-format", "json", "analyze"]).unwrap();
        assert_eq!(cli.log_format, TracingFormat::Json);
    }

    #[test]
    fn test_cli_log_filter_parsing() {
        let cli = Cli::try_parse_from(["taskrank", "analyze", "--log-filter", "taskrank_core=off"])
            .unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("taskrank_core=off"));

        let cli = Cli::try_parse_from(["taskrank", "analyze"]).unwrap();
        assert!(cli.log_filter.is_none());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "taskrank",
            "analyze",
            "--strategy",
            "deadline",
            "--input",
            "tasks.json",
            "--today",
            "2025-06-10",
            "--pretty",
        ])
        .unwrap();

        let Command::Analyze(request) = Command::from(cli.command) else {
            panic!("expected analyze");
        };
        assert_eq!(request.strategy.as_deref(), Some("deadline"));
        assert_eq!(request.input, Some(PathBuf::from("tasks.json")));
        assert_eq!(request.today, NaiveDate::from_ymd_opt(2025, 6, 10));
        assert!(request.pretty);
    }

    #[test]
    fn test_suggest_limit() {
        let cli = Cli::try_parse_from(["taskrank", "suggest", "-n", "5"]).unwrap();
        let Command::Suggest { limit, .. } = Command::from(cli.command) else {
            panic!("expected suggest");
        };
        assert_eq!(limit, Some(5));
    }

    #[test]
    fn test_invalid_today_is_rejected() {
        let result = Cli::try_parse_from(["taskrank", "analyze", "--today", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        let result = Cli::try_parse_from(["taskrank"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["taskrank", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
