//! Error types for lumo-pf

use crate::services::UnsplashError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream photo service failure (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// lumo-common error
    #[error("Common error: {0}")]
    Common(#[from] lumo_common::Error),
}

/// Translate client failures into tool-invocation error responses.
///
/// Exhausted retries, rate limiting and contract violations are all
/// upstream-class failures; a missing photo keeps not-found semantics.
impl From<UnsplashError> for ApiError {
    fn from(err: UnsplashError) -> Self {
        match err {
            UnsplashError::PhotoNotFound(id) => {
                ApiError::NotFound(format!("photo '{}'", id))
            }
            UnsplashError::ClientError { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_not_found_maps_to_not_found() {
        let err: ApiError = UnsplashError::PhotoNotFound("abc".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn client_error_maps_to_bad_request() {
        let err: ApiError = UnsplashError::ClientError {
            status: 401,
            body: "unauthorized".to_string(),
        }
        .into();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("401")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn transient_and_validation_map_to_upstream() {
        let err: ApiError = UnsplashError::Transient("HTTP 503".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));

        let err: ApiError = UnsplashError::Validation("bad shape".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
