use std::{path::PathBuf, process::exit};

use clap::Parser;
use compact_str::format_compact;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    client::{ClientConfig, HomeworkPoller},
    config::{default_config_path, BotConfig},
    logging::{init_logging, LoggingConfig},
    result::{BotError, Result},
};

mod client;
mod config;
mod domain;
mod logging;
mod result;

/// Relays Practicum homework review status changes to a Telegram chat
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,
    /// Start the fetch window at this unix timestamp instead of now.
    #[arg(long, value_name = "EPOCH_SECONDS")]
    from_date: Option<i64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    color_eyre::install()
        .map_err(|e| BotError::GeneralError(format_compact!("Failed to install color_eyre: {e}")))?;

    let dotenv_path = dotenvy::dotenv().ok();
    let config = BotConfig::load(&config_path)?.with_process_env();

    let _log_guard = initialize_logging(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Homework bot starting up");
    debug!(config_path = %config_path.display(), dotenv = ?dotenv_path, "Configuration loaded");

    let mut poller = match build_poller(config) {
        Ok(poller) => poller,
        Err(e) => {
            if e.is_configuration() {
                error!(
                    config_path = %config_path.display(),
                    "Set PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID or fill in the config file"
                );
            }
            return Err(e);
        },
    };
    if let Some(from_date) = args.from_date {
        poller = poller.with_cursor(from_date);
    }

    if args.once {
        match poller.run_cycle().await {
            Ok(outcome) => info!(?outcome, "Single poll cycle finished"),
            Err(e) => poller.report_failure(e).await,
        }
        info!(state = ?poller.state(), "Poll state after single cycle");
        return Ok(());
    }

    let shutdown = poller.shutdown_sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            let _ = shutdown.send(());
        }
    });

    info!(interval = ?poller.config().interval, "Polling for homework status changes");
    poller.start().await;
    Ok(())
}

fn initialize_logging(bot_config: &BotConfig) -> Result<Option<WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_env();

    // Override with config if specified
    if let Some(log_level) = &bot_config.log_level {
        logging_config = logging_config.with_level(log_level);
    }

    init_logging(logging_config).map_err(|e| {
        BotError::GeneralError(format_compact!("Failed to initialize logging: {e}"))
    })
}

/// Checks the secrets, then builds the clients. No request is made here.
fn build_poller(config: BotConfig) -> Result<HomeworkPoller> {
    if let Err(e) = config.validate() {
        error!(error = %e, "Startup configuration check failed");
        return Err(e);
    }

    Ok(HomeworkPoller::from_config(ClientConfig::from(config))?)
}
