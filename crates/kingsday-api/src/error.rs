//! Error types for the API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! converts into an HTTP response with a JSON `{error, status}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kingsday_core::FlowError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An action arrived before a game was started.
    #[error("game not started")]
    NotStarted,

    /// A flow operation failed.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// A persistence operation failed.
    #[error(transparent)]
    Store(#[from] kingsday_store::StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotStarted | Self::Flow(FlowError::NoPlayers) => StatusCode::BAD_REQUEST,
            Self::Flow(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
