//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Why a request to the server did not produce a result.
///
/// Each variant is logged with its own message; none of them touch host state.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused, DNS failure or timeout.
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server answered 2xx with a body that does not parse.
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Why `submit` refused to start a job.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The named source buffer does not exist in the host.
    #[error("Audio buffer not found: {0}")]
    BufferNotFound(String),

    #[error("Failed to prepare {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to export audio buffer: {0}")]
    Audio(#[from] hound::Error),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(std::io::Error),
}
