use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Sends logs to `<data_dir>/logs/glimpses.<date>.log`; the terminal belongs
/// to the UI. Filter with `RUST_LOG`, default `info`. Keep the guard alive
/// until exit so buffered lines are flushed.
pub fn init(data_dir: &Path) -> Result<WorkerGuard> {
    let logs = data_dir.join("logs");
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("glimpses")
        .filename_suffix("log")
        .build(&logs)
        .with_context(|| format!("failed to open log directory {}", logs.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
        .try_init()?;
    Ok(guard)
}
