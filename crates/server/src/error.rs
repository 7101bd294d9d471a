//! HTTP error shaping.
//!
//! Every failure a handler can produce ends up as an [`ApiError`], and this is
//! the only place that decides status codes and the JSON error body:
//!
//! ```text
//! 400  { success: false, message, error: "BadRequestError" }
//! 404  { success: false, message, error: "NotFoundError" }
//! 404  { success: false, message: "Route not found" }
//! 409  { success: false, message, error: "ConflictError" }
//! 422  { success: false, message, error: "ValidationError", details }
//! 500  { success: false, message, error: "Internal server error" }
//! ```
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schema::ValidationError;
use serde_json::json;
use service::ServiceError;
use thiserror::Error;

/// Message sent for internal errors when error details are hidden.
pub const HIDDEN_INTERNAL_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error(transparent)]
    Validation(ValidationError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Maps a service failure. Internal error text is replaced by
    /// [`HIDDEN_INTERNAL_MESSAGE`] unless `expose` is set.
    pub fn from_service(err: ServiceError, expose: bool) -> Self {
        match err {
            ServiceError::Validation(v) => ApiError::Validation(v),
            e @ ServiceError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            e @ ServiceError::Conflict { .. } => ApiError::Conflict(e.to_string()),
            other => ApiError::internal(other.to_string(), expose),
        }
    }

    pub fn internal(message: impl Into<String>, expose: bool) -> Self {
        let message = message.into();
        tracing::error!(error = %message, "internal error");
        if expose {
            ApiError::Internal(message)
        } else {
            ApiError::Internal(HIDDEN_INTERNAL_MESSAGE.to_string())
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) => json!({
                "success": false,
                "message": message,
                "error": "BadRequestError",
            }),
            ApiError::NotFound(message) => json!({
                "success": false,
                "message": message,
                "error": "NotFoundError",
            }),
            ApiError::RouteNotFound => json!({
                "success": false,
                "message": "Route not found",
            }),
            ApiError::Conflict(message) => json!({
                "success": false,
                "message": message,
                "error": "ConflictError",
            }),
            ApiError::Validation(v) => json!({
                "success": false,
                "message": v.summary(),
                "error": "ValidationError",
                "details": v.fields(),
            }),
            ApiError::Internal(message) => json!({
                "success": false,
                "message": message,
                "error": "Internal server error",
            }),
        };
        (status, Json(body)).into_response()
    }
}
