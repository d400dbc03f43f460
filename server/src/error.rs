//! Error types for the server binary.
//!
//! Everything here is fatal at startup: the process never becomes ready.

use std::path::PathBuf;

use appstate::ModelError;
use thiserror::Error;

/// Result type for server startup operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Device selection or model load failed.
    #[error("Model initialization failed: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}
