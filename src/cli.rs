//! CLI mode implementation
//!
//! Provides command-line interface for ranking record files and for
//! watching a debounced query stream

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gym-search CLI
#[derive(Parser, Debug)]
#[command(name = "gym-search")]
#[command(about = "Smart fuzzy search over gym equipment, brand and location records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "GYM_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank the records in a JSON file against a query
    Rank(RankArgs),
    /// Read query updates from stdin and print each debounced result set
    Watch(WatchArgs),
    /// Inspect or initialise the configuration file
    Config(ConfigArgs),
}

/// Rank command arguments
#[derive(Parser, Debug, Clone)]
pub struct RankArgs {
    /// JSON file holding an array of {"id", "name"} records
    #[arg(short = 'r', long)]
    pub records: PathBuf,

    /// Search text (case and accent insensitive)
    #[arg(short = 'q', long, allow_hyphen_values = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Show the relevance score of each result
    #[arg(long)]
    pub scores: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Watch command arguments
#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    /// JSON file holding an array of {"id", "name"} records
    #[arg(short = 'r', long)]
    pub records: PathBuf,

    /// Debounce delay in milliseconds (defaults to the configured value)
    #[arg(short = 'd', long)]
    pub debounce_ms: Option<u64>,

    /// Print the best match after every re-rank
    #[arg(short = 'a', long)]
    pub auto_select: bool,

    /// Maximum number of results per update
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// Config management arguments
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
    /// Print the JSON schema of the configuration file
    Schema,
}
