//! Error types for the model host and the separation path.

use std::path::PathBuf;
use thiserror::Error;

/// Audio decode/encode failures.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Audio has no channels")]
    NoChannels,

    #[error("Channel length mismatch: channel {channel} has {actual} frames, expected {expected}")]
    RaggedChannels {
        channel: usize,
        expected: usize,
        actual: usize,
    },
}

/// Failures reported by the model library.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The loader does not know this model identifier.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The model cannot be placed on the requested device.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Input batch could not be built.
    #[error("Failed to prepare input: {0}")]
    Input(#[from] AudioError),

    /// Inference itself failed.
    #[error("Inference error: {0}")]
    Inference(String),
}

/// Anything that goes wrong after the gate has been acquired.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to create staging file in {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: AudioError,
    },

    /// Renaming a staged file to its final name failed.
    #[error("Failed to commit {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
