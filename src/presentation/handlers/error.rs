use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::ClassificationError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Error leaving the HTTP surface: a status code plus a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "invalid_input",
            message: message.into(),
        }
    }
}

pub fn status_for(error: &ClassificationError) -> StatusCode {
    match error {
        ClassificationError::InvalidInput(_)
        | ClassificationError::Decode(_)
        | ClassificationError::ClipTooLong { .. } => StatusCode::BAD_REQUEST,
        ClassificationError::ClipTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ClassificationError::DegenerateFeature(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ClassificationError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ClassificationError::Inference(_)
        | ClassificationError::LookupMismatch(_)
        | ClassificationError::ShapeMismatch(_)
        | ClassificationError::Timeout(_)
        | ClassificationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ClassificationError> for ApiError {
    fn from(error: ClassificationError) -> Self {
        let status = status_for(&error);
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            format!("Internal server error: {error}")
        } else {
            error.to_string()
        };

        Self {
            status,
            kind: error.kind(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                kind = self.kind,
                message = %self.message,
                "Request failed"
            );
        } else {
            tracing::warn!(
                status = %self.status,
                kind = self.kind,
                message = %self.message,
                "Request rejected"
            );
        }

        (
            self.status,
            Json(ErrorResponse {
                error: self.kind.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}
