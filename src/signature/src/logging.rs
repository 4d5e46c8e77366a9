use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

/// Logs to stderr at `level` (overridden by `RUST_LOG`), and to `log_file` when one is set.
pub fn setup_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file {} has no file name", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
            Some(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_timer(SystemTime)
                    .with_writer(file_appender),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if let Some(path) = log_file {
        tracing::debug!("Logging system initialized. Writing to {}", path.display());
    }
    Ok(())
}
