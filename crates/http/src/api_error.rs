//! Typed API error for HTTP handlers.
//!
//! Converts service errors and extractor rejections into HTTP responses with
//! a JSON body. Handlers return `Result<Json<T>, ApiError>`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use aplus_service::{DIRECTORY_UNAVAILABLE, ServiceError};

/// API error with HTTP status code and human-readable message.
///
/// Serialized as `{"error": "message"}`. Messages never carry upstream sheet
/// errors; those are logged server-side.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 403 Forbidden: admin request from a non-loopback address.
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict: id card already registered.
    Conflict(String),
    /// 503 Service Unavailable: the sheet cannot be reached and nothing is cached.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::Duplicate(msg) => Self::Conflict(msg),
            ServiceError::ServiceUnavailable(msg) => Self::ServiceUnavailable(msg),
            ServiceError::SourceUnavailable(source) => {
                tracing::warn!(error = %source, "tutor sheet unavailable");
                Self::ServiceUnavailable(DIRECTORY_UNAVAILABLE.to_owned())
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
