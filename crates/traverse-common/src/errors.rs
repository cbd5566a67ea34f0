//! Library error types for the ambient stack (config loading, emitters).
//! Task-execution failure kinds (SKIP/FAIL/ERROR/CATASTROPHIC) live with the
//! engine in `traverse-core`; these are infrastructure errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config key '{0}' not found")]
    KeyNotFound(String),
}

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("failed to open log file: {0}")]
    OpenFile(#[source] std::io::Error),

    #[error("failed to write to log file: {0}")]
    Write(#[source] std::io::Error),
}
