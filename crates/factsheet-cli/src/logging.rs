//! Tracing subscriber setup.

use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// Log file name for a session started at `unix_secs`
pub fn log_file_name(unix_secs: u64) -> String {
    format!("app_{}.log", unix_secs)
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With a log directory, events go
/// to a new timestamped file there and its path is returned; otherwise they
/// go to stderr.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let path = dir.join(log_file_name(secs));
            let file = File::create(&path)?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;
            Ok(Some(path))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name(1_700_000_000), "app_1700000000.log");
    }
}
