//! HTTP error mapping.
//!
//! Client errors carry their message; server errors are logged and answered
//! with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use notepad_core::{NotepadServiceError, RepoError};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// Identity header missing or malformed.
    Unauthenticated(&'static str),
    /// Title absent or blank.
    MissingTitle,
    /// Request body could not be decoded.
    BadPayload(String),
    /// Notepad absent, not owned, or id unparseable.
    NotFound,
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::MissingTitle | Self::BadPayload(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated(reason) => write!(f, "authentication required: {reason}"),
            Self::MissingTitle => write!(f, "Title is required"),
            Self::BadPayload(message) => write!(f, "invalid request body: {message}"),
            Self::NotFound => write!(f, "notepad not found"),
            Self::Internal(_) => write!(f, "internal server error"),
        }
    }
}

impl From<NotepadServiceError> for ApiError {
    fn from(value: NotepadServiceError) -> Self {
        match value {
            NotepadServiceError::MissingTitle => Self::MissingTitle,
            NotepadServiceError::NotepadNotFound(_) => Self::NotFound,
            NotepadServiceError::Repo(err) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Validation(err) => Self::BadPayload(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(details) = &self {
            error!(
                "event=http_error module=http status=error code={} error={details}",
                status.as_u16()
            );
        }
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}
