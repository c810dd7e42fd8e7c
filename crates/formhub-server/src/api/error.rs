//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formhub_core::error::FormHubError;
use serde::Serialize;
use uuid::Uuid;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// A handler error. Wraps [`FormHubError`] so handlers can use `?` on
/// service calls.
#[derive(Debug)]
pub struct ApiError(pub FormHubError);

impl ApiError {
    pub fn unauthorized(reason: &str) -> Self {
        Self(FormHubError::AuthenticationFailed {
            reason: reason.into(),
        })
    }
}

impl From<FormHubError> for ApiError {
    fn from(err: FormHubError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(FormHubError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            FormHubError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            FormHubError::AuthenticationFailed { reason } => (StatusCode::UNAUTHORIZED, reason),
            FormHubError::AuthorizationDenied { reason } => (StatusCode::FORBIDDEN, reason),
            err @ FormHubError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            err @ FormHubError::AlreadyExists { .. } => (StatusCode::CONFLICT, err.to_string()),
            err @ (FormHubError::Database(_)
            | FormHubError::Crypto(_)
            | FormHubError::Internal(_)) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Parse a path id. Anything that is not a UUID cannot name a record,
/// so it is reported as not found.
pub fn parse_id(entity: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError(FormHubError::not_found(entity, raw)))
}
