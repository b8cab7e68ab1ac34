/// Error taxonomy for the monitoring core
///
/// Every failure here is recoverable: callers degrade (empty config, empty
/// dataset) instead of crashing. Row-level parse problems are diagnostics on
/// the dataset, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read threshold config at {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("threshold config at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid threshold for {metric}: {reason}")]
    Invalid { metric: &'static str, reason: String },

    #[error("failed to write threshold config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read sensor data from {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
