//! Moodlog - mood analytics engine
//!
//! Turns a log of mood entries into:
//! - Gap-filled daily and weekly trend series
//! - Quartile and outlier summaries
//! - Correlations with tags, time of day, weekday and energy
//! - Ranked behavioral patterns
//! - Tracking streaks

pub mod commands;
pub mod config;
pub mod correlation;
pub mod export;
pub mod models;
pub mod patterns;
pub mod source;
pub mod stats;
pub mod streak;
pub mod trends;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use commands::AnalysisContext;
use source::JsonFileSource;
use trends::Granularity;

/// Error type for commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// Serialized as the display string
impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ============================================================================
// Command line
// ============================================================================

/// Moodlog - analytics over a mood log
#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(version)]
#[command(
    about = "Trends, distributions, correlations, patterns and streaks from a mood log",
    long_about = None
)]
struct Cli {
    /// Mood log file: a JSON array or one JSON entry per line
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// UTC offset in minutes, overriding the config
    #[arg(long, global = true, allow_negative_numbers = true)]
    utc_offset: Option<i32>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full report: summary, trends, correlations, patterns and streak
    Report,

    /// Trend series
    Trends {
        /// Bucket size (day or week)
        #[arg(short, long, default_value = "day")]
        granularity: String,

        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },

    /// Quartiles and outliers, overall and per week
    Distribution,

    /// Mood against tags, time of day, weekday and energy
    Correlations,

    /// Ranked mood patterns
    Patterns {
        /// Number of patterns to keep
        #[arg(long)]
        top: Option<usize>,

        /// Detectors to run (comma-separated, e.g. time-of-day,emotion)
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,
    },

    /// Current and longest tracking streak
    Streak,

    /// Write trends or correlations (CSV) or the full report (JSON) to a file
    Export {
        /// Export format (csv or json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// What a CSV export holds (trends or correlations)
        #[arg(short, long, default_value = "trends")]
        what: String,

        /// Output file (defaults to a timestamped file in Downloads)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bucket size for CSV export (day or week)
        #[arg(short, long, default_value = "day")]
        granularity: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn execute(cli: Cli) -> Result<(), CommandError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(minutes) = cli.utc_offset {
        config.utc_offset_minutes = Some(minutes);
    }

    let mut ctx = AnalysisContext::new(config)?;
    if let Some(today) = cli.today.as_deref() {
        ctx = ctx.with_today(commands::parse_date(today)?);
    }

    let input = cli.input.unwrap_or_else(source::default_entries_path);
    tracing::info!("Reading entries from {:?}", input);
    let entries = commands::load_entries(&JsonFileSource::new(input))?;

    match cli.command {
        Commands::Report => print_json(&commands::build_report(&entries, &ctx)),
        Commands::Trends {
            granularity,
            start,
            end,
        } => {
            let series = commands::get_trends(
                &entries,
                &ctx,
                Granularity::from(granularity.as_str()),
                start.as_deref(),
                end.as_deref(),
            )?;
            print_json(&series)
        }
        Commands::Distribution => print_json(&commands::get_distribution(&entries, &ctx)),
        Commands::Correlations => print_json(&commands::get_correlations(&entries, &ctx)),
        Commands::Patterns { top, types } => {
            print_json(&commands::detect_mood_patterns(&entries, &ctx, types, top))
        }
        Commands::Streak => print_json(&commands::get_streak(&entries, &ctx)),
        Commands::Export {
            format,
            what,
            output,
            granularity,
        } => {
            let path = commands::export_analytics(
                &entries,
                &ctx,
                &format,
                &what,
                Granularity::from(granularity.as_str()),
                output.as_deref(),
            )?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

// ============================================================================
// Application Setup
// ============================================================================

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Running {:?}", cli.command);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&e).unwrap_or_else(|_| e.to_string())
            );
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_serializes_as_string() {
        let err = CommandError::InvalidArgument("bad date".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid argument: bad date\"");
    }

    #[test]
    fn test_command_error_from_config_error() {
        let err: CommandError = config::ConfigError::InvalidOffset(9999).into();
        assert!(err.to_string().contains("9999"));
    }

    #[test]
    fn test_cli_parses_trends() {
        let cli = Cli::try_parse_from([
            "moodlog",
            "trends",
            "--granularity",
            "week",
            "--start",
            "2026-02-01",
            "--input",
            "log.json",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("log.json")));
        match cli.command {
            Commands::Trends {
                granularity,
                start,
                end,
            } => {
                assert_eq!(granularity, "week");
                assert_eq!(start.as_deref(), Some("2026-02-01"));
                assert!(end.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_pattern_types() {
        let cli = Cli::try_parse_from([
            "moodlog",
            "patterns",
            "--types",
            "time-of-day,emotion",
            "--top",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Patterns { top, types } => {
                assert_eq!(top, Some(5));
                assert_eq!(
                    types,
                    Some(vec!["time-of-day".to_string(), "emotion".to_string()])
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_negative_offset() {
        let cli = Cli::try_parse_from(["moodlog", "--utc-offset", "-300", "streak"]).unwrap();
        assert_eq!(cli.utc_offset, Some(-300));
        assert!(matches!(cli.command, Commands::Streak));
    }

    #[test]
    fn test_cli_parses_export_content() {
        let cli = Cli::try_parse_from(["moodlog", "export", "--what", "correlations"]).unwrap();

        match cli.command {
            Commands::Export {
                format,
                what,
                granularity,
                ..
            } => {
                assert_eq!(format, "csv");
                assert_eq!(what, "correlations");
                assert_eq!(granularity, "day");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["moodlog"]).is_err());
    }

    #[test]
    fn test_execute_missing_input() {
        let cli = Cli::try_parse_from([
            "moodlog",
            "--input",
            "/nonexistent/moodlog/entries.json",
            "--utc-offset",
            "0",
            "streak",
        ])
        .unwrap();

        let err = execute(cli).unwrap_err();
        assert!(matches!(err, CommandError::Source(_)));
    }
}
