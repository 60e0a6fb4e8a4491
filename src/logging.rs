use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

const APP_DIR_NAME: &str = "grid-snake";
const LOG_FILE_NAME: &str = "grid-snake.log";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Installs the global subscriber, appending to `path`.
///
/// The terminal belongs to the game, so nothing is ever written to stdout or
/// stderr. `RUST_LOG` overrides the default `info` filter.
pub fn init(path: &Path) -> Result<(), LoggingError> {
    let file = open_log_file(path).map_err(|source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| LoggingError::Install(error.to_string()))
}

/// Like [`init`], but a failure only costs the log.
///
/// The problem is reported once on stderr, before the terminal is taken over,
/// and the game runs without a subscriber. Returns whether logging is active.
pub fn init_or_warn(path: &Path) -> bool {
    match init(path) {
        Ok(()) => true,
        Err(error) => {
            eprintln!("grid-snake: logging disabled: {error}");
            false
        }
    }
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}
