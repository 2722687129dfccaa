//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a file
//! when one is configured and stays silent otherwise.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

fn filter(default: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// A subscriber is already installed (tests, or a second `init`): keep it.
fn keep_existing(result: Result<(), TryInitError>) {
    if let Err(err) = result {
        debug!("keeping existing tracing subscriber: {err}");
    }
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init(target: LogTarget<'_>, verbose: bool) -> Result<(), AppError> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    match target {
        LogTarget::Stderr => {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            keep_existing(
                tracing_subscriber::registry()
                    .with(filter(level))
                    .with(layer)
                    .try_init(),
            );
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::terminal(format!("Failed to open log file '{}': {e}", path.display())))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            keep_existing(
                tracing_subscriber::registry()
                    .with(filter(Level::INFO.max(level)))
                    .with(layer)
                    .try_init(),
            );
        }
        LogTarget::Off => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        init(LogTarget::Stderr, false).unwrap();
        init(LogTarget::Stderr, true).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settle.log");
        init(LogTarget::File(&path), false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = init(LogTarget::File(dir.path()), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Terminal);
    }
}
