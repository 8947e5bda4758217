//! Logging configuration using the tracing ecosystem.
//!
//! Output goes to a daily-rotated file so it never corrupts the TUI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Default log level if neither `--log-level` nor RUST_LOG is given.
const DEFAULT_LOG_FILTER: &str = "mojira=info,warn";

/// Levels accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Initialize the logging system.
///
/// Logs are written to `<data_local_dir>/mojira/logs/mojira.log.<date>`.
/// `level` applies to this crate only and wins over `RUST_LOG`; pager
/// transitions are logged at `trace`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// if the filter does not parse, or if a global subscriber is already set.
pub fn init(level: Option<&str>) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "mojira.log");

    let directive = filter_directive(level, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{}'", directive))?;

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), filter = %directive, "mojira starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn filter_directive(level: Option<&str>, env: Option<String>) -> String {
    match (level, env) {
        (Some(level), _) => format!("mojira={},warn", level),
        (None, Some(env)) if !env.trim().is_empty() => env,
        _ => DEFAULT_LOG_FILTER.to_string(),
    }
}

/// Record where the configuration came from and what it points at.
pub fn log_session(config_path: &Path, config: &Config) {
    tracing::info!(
        config_path = %config_path.display(),
        exists = config_path.exists(),
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        "Configuration in effect"
    );
    tracing::debug!(
        theme = config.theme.as_str(),
        vim_mode = config.vim_mode,
        default_project = ?config.defaults.project,
        "Display settings"
    );
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("mojira").join("logs"))
}

/// Where log files are written, for display in the help screen.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("mojira shutting down");
}
