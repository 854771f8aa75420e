//! Tracing initialization.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "DYNREAD_LOG";
pub const LOG_FILE: &str = "dynread.log";

/// Initialize logging to `<log_dir>/dynread.log`.
///
/// Reads `DYNREAD_LOG` for the filter (`dynread=debug`, `dynread::reading=trace`, ...)
/// and falls back to `dynread=info`. The terminal belongs to the TUI, so nothing
/// is written to stdout or stderr.
///
/// Keep the returned guard alive until exit; dropping it flushes the log.
/// Returns `None` if logging was already set up or the log file cannot be
/// opened.
pub fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(log_dir).ok()?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("dynread=info"));
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(log_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    installed.then_some(guard)
}
