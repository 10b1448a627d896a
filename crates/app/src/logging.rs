use std::time::Duration;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error_tracking::{self, ErrorTrackingHandle};
use crate::state::AppConfig;

const ERROR_REPORT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Keeps the log writers and the error reporter alive
pub struct LoggingGuards {
    _writers: Vec<tracing_appender::non_blocking::WorkerGuard>,
    error_tracking: Option<ErrorTrackingHandle>,
}

impl LoggingGuards {
    /// Give queued error reports a chance to go out before exit
    pub async fn shutdown(self) {
        if let Some(handle) = &self.error_tracking {
            if !handle.flush(ERROR_REPORT_FLUSH_TIMEOUT).await {
                eprintln!("Warning: some error reports were not delivered");
            }
        }
    }
}

/// Initialize logging, error tracking, panic handler, and build info reporting.
/// Returns guards that must be kept alive for the duration of the program.
///
/// Must be called from within a tokio runtime.
pub fn init_logging(config: &AppConfig) -> LoggingGuards {
    let mut writers = Vec::new();

    // Stderr layer; stdout carries command output
    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    writers.push(stderr_guard);

    let stderr_env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(stderr_env_filter);

    // File layer (if log_dir is set)
    let file_layer = config.log_dir.as_ref().map(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
        }

        let file_appender = tracing_appender::rolling::daily(log_dir, "qube.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        writers.push(file_guard);

        let file_env_filter = EnvFilter::builder()
            .with_default_directive(config.log_level.into())
            .from_env_lossy();

        tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(file_env_filter)
    });

    let (tracking_layer, error_tracking) = match error_tracking::spawn(&config.error_tracking) {
        Ok(Some((layer, handle))) => (Some(layer), Some(handle)),
        Ok(None) => (None, None),
        Err(e) => {
            eprintln!("Warning: error tracking disabled: {}", e);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(tracking_layer)
        .init();

    register_panic_logger();
    report_build_info(config);

    LoggingGuards {
        _writers: writers,
        error_tracking,
    }
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}

pub fn report_build_info(config: &AppConfig) {
    let build = common::prelude::build_info();

    tracing::debug!(
        build_profile = ?build.build_profile,
        features = ?build.build_features,
        version = ?build.version,
        environment = %config.error_tracking.environment,
        "qube starting up"
    );
}
