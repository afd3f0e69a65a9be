/// File-backed tracing setup. The TUI owns the terminal, so nothing is ever
/// written to stdout/stderr; all diagnostics go to a rolling log file.
///
/// Filter directives come from `AGENTDECK_LOG` (or `RUST_LOG`), e.g.
/// `AGENTDECK_LOG=agentdeck=debug`. The log directory defaults to
/// `~/.agentdeck/logs/`, overridable with `AGENTDECK_LOG_DIR`.
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. The returned guard flushes buffered log
/// lines on drop; hold it for the lifetime of the process.
pub fn init() -> Result<WorkerGuard> {
    let filter = env::var("AGENTDECK_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| "agentdeck=info".to_string());
    let env_filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("agentdeck=info"));

    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory at {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "agentdeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().compact().with_ansi(false).with_writer(writer))
        .init();

    Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
    if let Ok(custom) = env::var("AGENTDECK_LOG_DIR") {
        return Ok(PathBuf::from(custom));
    }
    let home = env::var("HOME").context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".agentdeck").join("logs"))
}
