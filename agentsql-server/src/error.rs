//! API error types with IntoResponse
//!
//! Only routing-level failures map to error statuses; SQL execution
//! failures are part of the fulfillment contract and return 200 with an
//! error-shaped envelope (see `routes::webhook`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use agentsql_core::UnknownTag;

/// API error type with automatic HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Tag outside the set this service fulfills (400)
    #[error(transparent)]
    UnknownTag(#[from] UnknownTag),

    /// Request did not carry the session parameter the tag requires (400)
    #[error("missing required session parameter '{name}'")]
    MissingParameter { name: &'static str },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::UnknownTag(e) => {
                tracing::warn!("routing error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "unknown_tag",
                        "message": e.to_string()
                    }),
                )
            }
            Self::MissingParameter { .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "missing_parameter",
                    "message": self.to_string()
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
