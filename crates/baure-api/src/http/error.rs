//! Application error type mapping to HTTP status codes.
//!
//! Every error body is `{ "message": "..." }`, the shape the frontend reads.
//! Internal details are logged and never sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use baure_types::error::{ArchiveError, ChatError, UploadError};

const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat turn failures.
    Chat(ChatError),
    /// Archive CRUD failures.
    Archive(ArchiveError),
    /// Image upload failures.
    Upload(UploadError),
    /// Admin gate failure.
    Unauthorized(String),
    /// Malformed request.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<ArchiveError> for AppError {
    fn from(e: ArchiveError) -> Self {
        AppError::Archive(e)
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(e @ ChatError::MissingQuestion) => {
                (StatusCode::BAD_REQUEST, e.user_message().to_string())
            }
            AppError::Chat(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.user_message().to_string()),
            AppError::Archive(ArchiveError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Archive(ArchiveError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Archive(ArchiveError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Upload(e @ UploadError::UnsupportedType(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
            }
            AppError::Upload(e @ UploadError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
            }
            AppError::Upload(UploadError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Chat failures are already logged by the chat service.
        if status.is_server_error() && !matches!(self, AppError::Chat(_)) {
            tracing::error!(error = ?self, "request failed");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}
