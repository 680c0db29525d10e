//! Command-line arguments for the feed viewer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "feed_app",
    version,
    about = "Browse subreddits, comment threads and author profiles from the terminal"
)]
pub struct Cli {
    /// Subreddit to open on start (overrides the config file).
    #[arg(long, short = 's', value_name = "NAME")]
    pub subreddit: Option<String>,

    /// RON config file (default: ./feed_config.ron when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the stored credential (default: current directory).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Minimum milliseconds between two outbound requests.
    #[arg(long = "min-interval-ms", value_name = "MS")]
    pub min_interval_ms: Option<u64>,

    /// Where log output goes.
    #[arg(long = "log-destination", value_enum, default_value = "file")]
    pub log_destination: LogDestinationArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestinationArg {
    /// ./feed.log in the current directory.
    File,
    /// Standard error.
    Terminal,
    Both,
}
