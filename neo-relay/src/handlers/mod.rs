pub mod gemini;
pub mod health;
pub mod metrics;
pub mod neo;

use crate::services::UpstreamResponse;
use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Relay an upstream reply: same status, same bytes, JSON content type.
pub(crate) fn relay(upstream: UpstreamResponse) -> Response {
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
        .into_response()
}
