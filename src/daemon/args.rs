use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use super::DaemonSettings;

/// Collector knobs shared by the daemon binary and the cli `serve` command.
#[derive(clap::Args, Debug, Clone)]
pub struct CollectorArgs {
    #[arg(
        long = "poll-interval",
        default_value_t = 5,
        help = "Seconds between polls of the desktop state"
    )]
    pub poll_interval: u64,
    #[arg(
        long = "idle-threshold",
        default_value_t = 60,
        help = "Seconds of no input after which the user counts as inactive"
    )]
    pub idle_threshold: u32,
    #[arg(
        long,
        default_value = "Google Chrome",
        help = "Browser application tracked for tab changes"
    )]
    pub browser: String,
}

impl CollectorArgs {
    pub fn to_settings(&self) -> DaemonSettings {
        DaemonSettings {
            poll_interval: std::time::Duration::from_secs(self.poll_interval),
            idle_threshold_seconds: self.idle_threshold,
            browser: self.browser.clone(),
        }
    }
}

#[derive(Parser)]
pub struct DaemonArgs {
    #[arg(long)]
    pub force: bool,
    #[arg(long)]
    pub dir: Option<PathBuf>,
    #[command(flatten)]
    pub collector: CollectorArgs,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
