use std::error::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::config::Settings;

/// Installs the global subscriber.
///
/// Console output is always on. When `logging.file` is set, a daily-rotated
/// file under that directory receives the same events. `RUST_LOG` overrides
/// the configured level. Keep the returned guard alive for the life of the
/// process so buffered file logs are flushed on exit.
pub fn init(settings: &Settings) -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level()))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_target(false)
            .boxed(),
    );

    let mut guard = None;
    if let Some(log_dir) = &settings.logging.file {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::RollingFileAppender::new(
            tracing_appender::rolling::Rotation::DAILY,
            log_dir,
            "sumserve",
        );
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            // Disable ANSI colors for cleaner log files
            .with_ansi(false)
            .with_line_number(true)
            .with_file(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_target(false);

        if settings.logging.json {
            layers.push(file_layer.json().boxed());
        } else {
            layers.push(file_layer.boxed());
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(guard)
}
