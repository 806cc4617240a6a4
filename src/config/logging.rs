//! Logging Config
//!
//! Flags shared by every `decora` subcommand.

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event for terminals
    #[default]
    Compact,

    /// One JSON object per event
    Json,
}

/// Where and how much the CLI logs. Events always go to stderr.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `decora=debug`
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Output format
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}
