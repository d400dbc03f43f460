//! Backend error contract.
//!
//! The backend returns these typed errors instead of strings so the HTTP layer
//! can map each one to a status code without inspecting messages.

use thiserror::Error;

/// Failures of a separation request, as seen by the transport layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Request failed validation; the gate was never touched (400).
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Another separation holds the gate (503).
    #[error("Server busy: a separation is already in progress")]
    ServerBusy,

    /// Startup has not completed or the model was unloaded (503).
    #[error("Model not loaded")]
    ModelNotReady,

    /// Inference or artifact write failed after admission (500).
    #[error("Separation failed: {message}")]
    ProcessingFailure { message: String },
}

impl BackendError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn processing(message: impl ToString) -> Self {
        Self::ProcessingFailure {
            message: message.to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
