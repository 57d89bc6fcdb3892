use super::relay;
use crate::services::FeedQuery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use service_core::error::AppError;
use service_core::observability::extract_request_id;

/// Fixed message returned when a lookup cannot be completed.
pub const LOOKUP_NOT_FOUND_MESSAGE: &str = "Asteroid with that id does not exist";

/// Feed parameters read from the raw query pairs.
///
/// Repeated keys are tolerated; the first occurrence wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FeedParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = FeedParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "start_date" => &mut params.start_date,
                "end_date" => &mut params.end_date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Today's date in the server's local time zone, as NeoWs expects it.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Proxy the NeoWs feed. `start_date` defaults to today and is forwarded as given.
pub async fn neo_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = FeedParams::from_pairs(pairs);
    let query = FeedQuery {
        start_date: params.start_date.unwrap_or_else(today),
        end_date: params.end_date,
    };
    let request_id = extract_request_id(&headers);

    let upstream = state
        .upstream
        .neo_feed(&query, request_id.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(
                start_date = %query.start_date,
                error = %e,
                "NeoWs feed request failed"
            );
            AppError::BadGateway(e.to_string())
        })?;

    tracing::info!(
        start_date = %query.start_date,
        status = %upstream.status,
        "NeoWs feed relayed"
    );

    Ok(relay(upstream))
}

/// Proxy a NeoWs lookup by SPK-ID. Any upstream failure becomes a 404.
pub async fn neo_lookup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request_id = extract_request_id(&headers);

    let upstream = state
        .upstream
        .neo_lookup(&id, request_id.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(asteroid_id = %id, error = %e, "NeoWs lookup failed");
            AppError::NotFound(LOOKUP_NOT_FOUND_MESSAGE.to_string())
        })?;

    tracing::info!(asteroid_id = %id, status = %upstream.status, "NeoWs lookup relayed");

    Ok(relay(upstream))
}
