// crates/showcut-core/src/logging.rs
//
// Tracing subscriber setup.
//
// Two fmt layers on one registry:
//   • file   : every event passing the configured filter, no ANSI. Written
//     through a tracing-appender non-blocking worker; keep the returned
//     `LogGuard` alive until exit or the tail of the log is lost.
//   • stderr : warnings and errors only while a file is attached, otherwise
//     the configured filter.
//
// `RUST_LOG` overrides `LoggingConfig::level` for the file layer.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{fmt, EnvFilter, Layer as _};

use crate::config::LoggingConfig;

/// Flushes the log file on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber. A second call leaves the first subscriber
/// in place.
pub fn init_logging(config: &LoggingConfig) -> LogGuard {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file, file_error) = match config.file.as_deref().map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e))   => (None, Some(e)),
        None           => (None, None),
    };

    let (file_layer, guard) = match file {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_filter = if file_layer.is_some() { EnvFilter::new("warn") } else { filter() };
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if let (Some(path), Some(e)) = (config.file.as_deref(), file_error) {
        tracing::warn!(path = %path.display(), error = %e, "log file unavailable, logging to stderr only");
    }
    tracing::debug!(installed, "logging initialised");

    LogGuard { _file: guard }
}

/// Create the parent directory and truncate `path`.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log").join("nested").join("debug.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn blocked_parent_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("log");
        std::fs::write(&blocker, b"not a directory").unwrap();
        assert!(open_log_file(&blocker.join("debug.log")).is_err());
    }

    #[test]
    fn unusable_log_file_still_installs_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("log");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let guard = init_logging(&LoggingConfig {
            level: "debug".to_string(),
            file:  Some(blocker.join("debug.log")),
        });
        assert!(guard._file.is_none());
    }
}
