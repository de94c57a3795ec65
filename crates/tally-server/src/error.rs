//! API error type and its HTTP mapping.
//!
//! A failed read/count surfaces as an error response with no entries; a
//! failed delete surfaces as an error leaving stored rows untouched. There
//! is no automatic retry.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tally_core::StorageError;

/// Errors surfaced by the viewer handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No caller identity header was forwarded.
    #[error("missing caller identity")]
    Unauthenticated,

    /// The caller is not on the admin allow-list.
    #[error("caller is not an administrator")]
    Forbidden,

    /// A query parameter could not be interpreted.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// The storage adapter failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
