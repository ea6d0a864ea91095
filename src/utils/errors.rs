use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Message returned to clients for every failure on the store side
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch transactions";

/// Failures of a transaction listing request
#[derive(Debug, Error)]
pub enum ListingError {
    /// The request itself is unusable; the message is safe to show the caller
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
    /// The deadline passed or the server cancelled the statement (SQLSTATE 57014)
    #[error("Listing cancelled after {0:?}")]
    Timeout(Duration),
}

/// Error rendered as `{"error": <message>}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::Validation(message) => {
                debug!("Rejected listing request: {}", message);
                ApiError::bad_request(message)
            }
            // Root cause stays in the log
            other => {
                error!("Failed to list transactions: {}", other);
                ApiError::internal(FETCH_FAILED_MESSAGE)
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    }
}
