// Logging setup.
// Writes tracing output to a file so it never interferes with the interactive menus.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cache::log_dir;
use crate::error::{Result, TauError};

const LOG_FILE_NAME: &str = "tau.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init(cache_dir: &Path, filter: &str) -> Result<WorkerGuard> {
    let dir = log_dir(cache_dir);
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(filter)
        .map_err(|e| TauError::Other(format!("Invalid TAU_LOG filter {:?}: {}", filter, e)))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| TauError::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}
