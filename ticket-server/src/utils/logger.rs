//! Logging Infrastructure
//!
//! Console output plus an optional daily-rolling JSON file under the logs dir.
//! `LOG_LEVEL` accepts a plain level (`info`) or a full filter expression
//! (`ticket_server=debug,tower_http=info`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging only
pub fn init_logger(log_level: &str, json: bool) {
    // No file writer, so there is no guard to keep
    let _ = init_logger_with_file(log_level, json, None);
}

/// Initialize the logger with optional file output
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logger_with_file(
    log_level: &str,
    json: bool,
    log_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) if dir.exists() => {
            let file_appender = tracing_appender::rolling::daily(dir, "ticket-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    // A second init (tests, embedded use) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init();

    guard
}
