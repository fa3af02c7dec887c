//! Tracing subscriber setup for training runs.
//!
//! Events go to stdout and, when a log directory is given, to a fresh
//! `train_YYYYMMDD_HHMMSS.log` file in that directory. The filter defaults to
//! `info` and can be overridden through `RUST_LOG`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{Result, TabularPpoError};

/// Name of the log file for a run started now
pub fn log_file_name() -> String {
    format!("train_{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber. Returns the log file path when one was created.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(true);

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name());
            let file = File::create(&path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));

            Registry::default()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| TabularPpoError::Logging(e.to_string()))?;
            Ok(Some(path))
        }
        None => {
            Registry::default()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .map_err(|e| TabularPpoError::Logging(e.to_string()))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("train_"));
        assert!(name.ends_with(".log"));
        // train_ + 8 digit date + _ + 6 digit time + .log
        assert_eq!(name.len(), 6 + 8 + 1 + 6 + 4);
    }

    #[test]
    fn test_second_init_is_an_error() {
        // Whichever call wins the global slot, the other must fail cleanly
        let first = init_tracing(None);
        let second = init_tracing(None);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(TabularPpoError::Logging(_))));
    }
}
