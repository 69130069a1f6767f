//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file
//!   (default "logs/token-metadata-client.log")
//!
//! Initialising a logger is left to the embedding application; calling
//! [`setup_logging`] a second time is a no-op that returns an error.

use chrono::Utc;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, File},
    path::Path,
};
use thiserror::Error;

const DEFAULT_LOG_FILE_PATH: &str = "logs/token-metadata-client.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unable to create log file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to initialize logger: {0}")]
    Init(#[from] log::SetLoggerError),
}

fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Appends the UTC date to the file name, keeping a `.log` extension last.
fn rolled_file_path(base_file_path: &str, date_str: &str) -> String {
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.log", trimmed, date_str),
        None => format!("{}-{}.log", base_file_path, date_str),
    }
}

pub fn setup_logging() -> Result<(), LoggingError> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let level_filter = parse_level(&log_level);

    if log_mode.to_lowercase() == "file" {
        let base_file_path =
            env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let rolled_file_path = rolled_file_path(&base_file_path, &date_str);

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).map_err(|source| LoggingError::File {
                path: rolled_file_path.clone(),
                source,
            })?;
        }

        let log_file = File::create(&rolled_file_path).map_err(|source| LoggingError::File {
            path: rolled_file_path.clone(),
            source,
        })?;

        WriteLogger::init(level_filter, Config::default(), log_file)?;
    } else {
        SimpleLogger::init(level_filter, Config::default())?;
    }

    info!("Logging is successfully configured (mode: {})", log_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_rolled_file_path() {
        assert_eq!(
            rolled_file_path("logs/client.log", "2024-01-31"),
            "logs/client-2024-01-31.log"
        );
        assert_eq!(
            rolled_file_path("logs/client", "2024-01-31"),
            "logs/client-2024-01-31.log"
        );
    }
}
