//! Unified error handling for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::DirectoryError;

/// Application-level error type for the directory API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write would break a uniqueness or reference rule.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Database(other),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            DirectoryError::AlreadyExists { .. } => Self::Conflict(err.to_string()),
            DirectoryError::InvalidInput(message) => Self::BadRequest(message),
            DirectoryError::Repository(inner) => inner.into(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    error: &'static str,
    message: String,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Directory request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(m) | Self::Conflict(m) | Self::BadRequest(m) => m,
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn get_status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("state 9 not found".to_string());
        assert_eq!(err.to_string(), "Not found: state 9 not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_directory_error_status_codes() {
        assert_eq!(
            get_status(DirectoryError::NotFound {
                entity: "city",
                id: 1
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(DirectoryError::AlreadyExists {
                entity: "city",
                name: "Cholula".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(DirectoryError::InvalidInput("name must not be blank".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(DirectoryError::Repository(RepositoryError::Conflict(
                "cities still reference this row".to_string()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_repository_error_status_codes() {
        assert_eq!(get_status(RepositoryError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(RepositoryError::DataCorruption("bad row".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_shape() {
        let response = AppError::from(DirectoryError::AlreadyExists {
            entity: "state",
            name: "Puebla".to_string(),
        })
        .into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 409);
        assert_eq!(body["error"], "Conflict");
        assert_eq!(body["message"], "state \"Puebla\" already exists");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response =
            AppError::from(RepositoryError::DataCorruption("secret detail".to_string()))
                .into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Internal server error");
    }
}
