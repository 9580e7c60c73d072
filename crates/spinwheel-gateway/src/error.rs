//! Error types for the gateway's HTTP surface.
//!
//! [`GatewayError`] unifies all handler failure modes into a single enum
//! that converts into an Axum HTTP response. Server-side failures never
//! leak internal details to the caller; the details go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use spinwheel_core::{StoreError, ValidationError};
use tracing::error;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A segment replacement payload was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The webhook secret was missing or wrong.
    #[error("Invalid token")]
    Unauthorized,

    /// Segments were swapped in memory but could not be written to disk.
    #[error("segment persistence failed: {0}")]
    Persistence(#[source] StoreError),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(v) => Self::Validation(v),
            other => Self::Persistence(other),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Persistence(e) => {
                error!(error = %e, "Error updating segments");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Failed to update segments"),
                )
            }
            Self::Internal(msg) => {
                error!(error = %msg, "Unhandled error in request handler");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Internal server error"),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
