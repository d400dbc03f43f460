//! Error types for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sam_audio_values::{BackendError, ErrorBody};
use std::fmt;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types following RFC 7807 Problem Details.
#[derive(Debug)]
pub enum ApiError {
    /// Validation error (400) - a specific field failed validation
    ValidationError {
        field: String,
        message: String,
        request_id: Option<String>,
    },

    /// Service unavailable (503) - busy or not ready; retry later
    ServiceUnavailable {
        message: String,
        request_id: Option<String>,
    },

    /// Internal server error (500)
    Internal {
        message: String,
        request_id: Option<String>,
    },
}

impl ApiError {
    /// Attach the request id that is echoed in the problem body.
    pub fn with_request_id(mut self, id: impl ToString) -> Self {
        let slot = match &mut self {
            Self::ValidationError { request_id, .. }
            | Self::ServiceUnavailable { request_id, .. }
            | Self::Internal { request_id, .. } => request_id,
        };
        *slot = Some(id.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Validation Error",
            Self::ServiceUnavailable { .. } => "Service Unavailable",
            Self::Internal { .. } => "Internal Server Error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError { field, message, .. } => {
                write!(f, "Validation Error [field: {}]: {}", field, message)
            }
            Self::ServiceUnavailable { message, .. } => write!(f, "Service Unavailable: {}", message),
            Self::Internal { message, .. } => write!(f, "Internal Error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let title = self.title();
        let (detail, request_id) = match self {
            Self::ValidationError { message, request_id, .. } => (message, request_id),
            Self::ServiceUnavailable { message, request_id } => (message, request_id),
            Self::Internal { message, request_id } => (message, request_id),
        };

        let problem = ErrorBody {
            type_uri: format!("/errors/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
            request_id,
        };

        (status, Json(problem)).into_response()
    }
}

/// Map the backend taxonomy onto HTTP.
///
/// Busy and not-ready share 503 but keep distinct messages so callers can
/// tell "retry shortly" from "server still starting".
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidInput { field, reason } => ApiError::ValidationError {
                field,
                message: reason,
                request_id: None,
            },
            BackendError::ServerBusy => ApiError::ServiceUnavailable {
                message: "Server busy — a separation is already in progress".to_string(),
                request_id: None,
            },
            BackendError::ModelNotReady => ApiError::ServiceUnavailable {
                message: "Model not loaded".to_string(),
                request_id: None,
            },
            BackendError::ProcessingFailure { message } => ApiError::Internal {
                message,
                request_id: None,
            },
        }
    }
}
