use super::relay;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Response,
};
use service_core::error::AppError;
use service_core::observability::extract_request_id;

/// Forward a `generateContent` payload to Gemini unmodified.
///
/// The body must be declared and parse as JSON; it is otherwise passed through
/// byte-for-byte, and Gemini's status code is preserved.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if !is_json_content_type(&headers) {
        return Err(AppError::UnsupportedMediaType(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    serde_json::from_slice::<serde::de::IgnoredAny>(&body).map_err(|e| {
        AppError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
    })?;

    let request_id = extract_request_id(&headers);

    let upstream = state
        .upstream
        .generate_content(body, request_id.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(
                model = %state.config.gemini.model,
                error = %e,
                "Gemini request failed"
            );
            AppError::BadGateway(e.to_string())
        })?;

    if upstream.status.is_success() {
        tracing::info!(status = %upstream.status, "Gemini response relayed");
    } else {
        tracing::warn!(status = %upstream.status, "Gemini returned an error status");
    }

    Ok(relay(upstream))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn accepts_json_with_parameters() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("Application/JSON; charset=utf-8")));
        assert!(is_json_content_type(&headers("application/vnd.api+json")));
    }

    #[test]
    fn rejects_other_media_types() {
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }
}
