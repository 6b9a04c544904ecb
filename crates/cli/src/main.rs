//! Voltbay CLI - peer-to-peer EV battery marketplace

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use tracing::{error, info, Level};
use voltbay_http::ClientError;

#[derive(Parser)]
#[command(name = "voltbay")]
#[command(about = "A peer-to-peer marketplace for EV batteries")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Data directory for session state and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Override the backend base URL from configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into(), cli.data_dir.clone(), cli.no_file_log)?;

    info!("Starting Voltbay CLI");

    match cli.command.execute(cli.data_dir, cli.base_url).await {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(err) => {
            if let Some(client_err) = err.downcast_ref::<ClientError>() {
                if client_err.is_auth_expired() {
                    eprintln!("Your session has expired. Run `voltbay login` to continue.");
                }
            }
            error!("Command failed: {err}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
