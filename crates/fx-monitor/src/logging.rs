//! Logging setup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use tracing_appender::non_blocking::WorkerGuard;

/// Setup logging with the given level.
///
/// `RUST_LOG` takes precedence over `level`. When `file` is set, events are
/// also written as JSON to a daily-rolling file next to it; keep the
/// returned guard alive until exit so buffered lines are flushed.
pub fn setup_logging(level: &str, json: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match file {
        Some(path) => {
            let (dir, prefix) = log_target(path);
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, prefix));
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .with(writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer)))
            .init();
    }

    guard
}

/// Directory and file prefix for a rolling log path.
fn log_target(path: &Path) -> (PathBuf, OsString) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("fxsignals.log"));
    (dir, prefix)
}
