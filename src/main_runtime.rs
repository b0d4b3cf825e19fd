use dpos_restaker::config::LoggingConfig;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Console logging (plain or JSON) plus an optional daily-rolling file.
///
/// `RUST_LOG` overrides `logging.level`. The returned guard must be kept
/// alive until exit so buffered file output is flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=warn,reqwest=warn", config.level)));

    // `tracing_appender::rolling::daily` panics if it cannot create the
    // initial file, so check writability first.
    let (file_layer, guard) = match config.dir.as_deref() {
        Some(log_dir) => {
            let writable = std::fs::create_dir_all(log_dir).is_ok() && {
                let test_path = std::path::Path::new(log_dir).join(".restaker_write_test");
                let ok = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&test_path)
                    .is_ok();
                let _ = std::fs::remove_file(&test_path);
                ok
            };

            if writable {
                let file_appender = tracing_appender::rolling::daily(log_dir, "restaker.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true);
                (Some(layer), Some(guard))
            } else {
                eprintln!(
                    "Warning: Could not write to log directory {}, file logging disabled",
                    log_dir
                );
                (None, None)
            }
        }
        None => (None, None),
    };

    let json_layer = config
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_target(true));
    let console_layer = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

pub fn init_logging_simple() {
    // Minimal logging for startup failures
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
