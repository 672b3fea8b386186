use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use super::indicator::DEFAULT_PLACEHOLDER;

#[derive(Parser, Debug)]
#[command(name = "dimer-status", version)]
#[command(about = "Prints the Dimer countdown once per second, for status bars")]
pub struct StatusArgs {
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Print a single label and exit.
    #[arg(long)]
    pub once: bool,
    /// Label printed while no timer is set up.
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    pub placeholder: String,
    /// Mirror logs to stderr. Stdout is reserved for labels.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
