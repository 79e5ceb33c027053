use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for the `cairn` binary.
#[derive(Debug, Parser)]
#[command(name = "cairn", version, about = "Cairn - audit artifact review core")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the job roster, most recent first
    Jobs,
    /// Fetch one job's artifacts (cache-aside) and print the bundle
    Show {
        /// Job id from the roster
        job_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    Raw,
}
