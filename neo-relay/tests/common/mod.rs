#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use neo_relay::config::{CorsConfig, GeminiConfig, NasaConfig, RelayConfig};
use neo_relay::services::UpstreamClient;
use neo_relay::startup::build_router;
use neo_relay::AppState;
use secrecy::Secret;
use service_core::config::Config;
use tower::util::ServiceExt;

pub const NASA_KEY: &str = "test-nasa-key";
pub const GEMINI_KEY: &str = "test-gemini-key";
pub const GEMINI_MODEL: &str = "gemini-test";

/// Path prefixes mirroring the real upstream layouts.
pub const NASA_PREFIX: &str = "/neo/rest/v1";
pub const GEMINI_PREFIX: &str = "/v1beta";

/// A base URL nothing listens on, for transport failures.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn test_config(nasa_root: &str, gemini_root: &str) -> RelayConfig {
    RelayConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        nasa: NasaConfig {
            api_key: Secret::new(NASA_KEY.to_string()),
            base_url: format!("{}{}", nasa_root, NASA_PREFIX),
        },
        gemini: GeminiConfig {
            api_key: Secret::new(GEMINI_KEY.to_string()),
            base_url: format!("{}{}", gemini_root, GEMINI_PREFIX),
            model: GEMINI_MODEL.to_string(),
        },
        cors: CorsConfig::default(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
    }
}

pub fn app(nasa_root: &str, gemini_root: &str) -> Router {
    let config = test_config(nasa_root, gemini_root);
    let upstream = UpstreamClient::new(config.nasa.clone(), config.gemini.clone())
        .expect("Failed to create upstream client");
    build_router(AppState::new(config, upstream))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Response body is not JSON")
}
