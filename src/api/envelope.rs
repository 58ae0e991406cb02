//! Consistent response envelope for all API endpoints.
//!
//! Every response is wrapped in either [`ApiResponse`] (success) or
//! [`ApiErrorResponse`] (error), ensuring a uniform JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

/// API surface version reported in `meta.version`.
pub const API_VERSION: &str = "1";

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
        }
    }
}

/// Successful response: `{ "data": T, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Error response: `{ "error": { "code": "...", "message": "..." }, "meta": { ... } }`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
            },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn not_found(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
    }

    /// A category value the model was not trained on.
    pub fn unknown_category(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_CATEGORY", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
    }
}
