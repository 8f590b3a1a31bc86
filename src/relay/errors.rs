use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::responses::RelayFailure;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Workflow ID is required")]
    MissingParameter,
    #[error("Workflow not found")]
    NotFound,
    #[error("Workflow is not properly configured")]
    Misconfigured,
    #[error("Total upload size exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },
    /// The destination answered with a non-success status.
    #[error("Webhook request failed: {status_text}")]
    Destination {
        status: StatusCode,
        status_text: String,
        details: String,
    },
    #[error("Upload failed")]
    UploadFailed { message: String },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter => StatusCode::BAD_REQUEST,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Destination { status, .. } => *status,
            RelayError::UploadFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller mistakes as opposed to deployment or destination problems.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingParameter
                | RelayError::NotFound
                | RelayError::PayloadTooLarge { .. }
        )
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        RelayError::UploadFailed {
            message: message.into(),
        }
    }

    /// The destination body or transport reason behind the error, if any.
    /// Safe to log once the error has been redacted.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RelayError::Destination { details, .. } => Some(details),
            RelayError::UploadFailed { message } => Some(message),
            _ => None,
        }
    }

    pub fn to_failure(&self) -> RelayFailure {
        let (details, message) = match self {
            RelayError::Destination { details, .. } => (Some(details.clone()), None),
            RelayError::UploadFailed { message } => (None, Some(message.clone())),
            _ => (None, None),
        };
        RelayFailure {
            error: self.to_string(),
            details,
            message,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_failure())).into_response()
    }
}
