//! File logging.
//!
//! The terminal belongs to the TUI, so log lines go to a daily-rolling file in the
//! configured log directory. `RUST_LOG` overrides the default filter.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "vidchat=info,vidchat_core=info";

/// Installs the global subscriber. Keep the returned guard alive until exit or
/// buffered lines are lost.
///
/// # Errors
///
/// Returns `Err` if the log directory cannot be created or a global subscriber
/// is already installed.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "vidchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
    Ok(guard)
}
