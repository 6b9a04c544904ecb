use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for the CLI
pub fn init_logging(log_level: Level, data_dir: Option<PathBuf>, no_file_log: bool) -> Result<()> {
    if no_file_log {
        init_stderr_logging(log_level)
    } else {
        init_file_logging(log_level, data_dir)
    }
}

fn default_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("voltbay={level_str},voltbay_http={level_str},voltbay_core={level_str}").into()
    })
}

fn init_file_logging(level: Level, data_dir: Option<PathBuf>) -> Result<()> {
    let env_filter = default_filter(level);

    let log_file_path = get_log_file_path(data_dir)?;
    if let Some(parent) = log_file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_ansi(true))
        .init();

    Ok(())
}

fn init_stderr_logging(level: Level) -> Result<()> {
    let env_filter = default_filter(level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn get_log_file_path(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    Ok(crate::config::resolve_data_dir(data_dir).join("cli.log"))
}
