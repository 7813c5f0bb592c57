pub mod daemon_path;
pub mod process;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{daemon_binary_path, kill_previous_daemons, restart_daemon};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::{args::CollectorArgs, start_daemon, LOG_FILE_NAME},
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
    viewer::server::{serve, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "Focuslog", version, long_about = None)]
#[command(about = "Tracks the focused app, browser tab and idle state, and serves a daily report", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start the collector daemon in the background")]
    Init {
        #[command(flatten)]
        collector: CollectorArgs,
    },
    #[command(about = "Serve the daily activity report over HTTP")]
    View {
        #[arg(long, default_value_t = 5000, help = "Port to listen on")]
        port: u16,
        #[arg(
            long = "log-file",
            help = "Path to the event log. Defaults to the log the daemon writes"
        )]
        log_file: Option<PathBuf>,
    },
    #[command(
        about = "Run the collector directly in the current console. Used for debugging; normally `init` is what you want"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into the platform state directory"
        )]
        dir: Option<PathBuf>,
        #[command(flatten)]
        collector: CollectorArgs,
    },
    #[command(about = "Stop a currently running collector daemon")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Init { collector } => {
            restart_daemon(&collector)?;
            Ok(())
        }
        Commands::Stop {} => {
            kill_previous_daemons(&daemon_binary_path());
            Ok(())
        }
        Commands::Serve { dir, collector } => {
            let dir = dir.unwrap_or(app_dir);
            start_daemon(dir, collector.to_settings()).await
        }
        Commands::View { port, log_file } => {
            let log_path = log_file.unwrap_or_else(|| app_dir.join(LOG_FILE_NAME));
            serve(ServeConfig { port, log_path }).await
        }
    }
}
