use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber writing to `log_path`
///
/// `RUST_LOG` takes precedence over `config.level`. The returned guard
/// flushes buffered lines when dropped and must outlive the program's work.
pub fn init_logging(config: &LoggingConfig, log_path: &Path) -> io::Result<WorkerGuard> {
    let (dir, file_name) = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(file_name)) => (dir, file_name),
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid log path: {:?}", log_path),
            ));
        }
    };
    fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // A subscriber may already be installed (tests, embedding hosts)
    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!("Global subscriber already set: {}", e);
    }

    Ok(guard)
}
