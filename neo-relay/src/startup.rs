//! Router construction and server lifecycle.

use crate::config::{CorsConfig, RelayConfig};
use crate::handlers::{gemini, health::health_check, metrics::metrics, neo};
use crate::services::UpstreamClient;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Largest `/gemini` request accepted, matching Gemini's own inline request cap.
pub const GEMINI_MAX_REQUEST_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/neo-feed", get(neo::neo_feed))
        .route("/neo-lookup/:id", get(neo::neo_lookup))
        .route(
            "/gemini",
            post(gemini::generate).layer(DefaultBodyLimit::max(GEMINI_MAX_REQUEST_BYTES)),
        )
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser frontend.
///
/// `FRONTEND_ORIGIN` may hold one origin or a comma-separated list. When it is
/// unset every origin is allowed.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = match cors.frontend_origin.as_deref() {
        None => AllowOrigin::any(),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                        None
                    }
                })
                .collect();

            if origins.is_empty() {
                tracing::error!("No valid CORS origin configured. Allowing any origin.");
                AllowOrigin::any()
            } else {
                AllowOrigin::list(origins)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Binds the listener immediately; port 0 picks a random free port.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let upstream = UpstreamClient::new(config.nasa.clone(), config.gemini.clone())
            .map_err(|e| {
                tracing::error!("Failed to create upstream HTTP client: {}", e);
                AppError::InternalError(anyhow::Error::new(e))
            })?;

        tracing::info!(
            nasa_base = %config.nasa.base_url,
            gemini_base = %config.gemini.base_url,
            gemini_model = %config.gemini.model,
            frontend_origin = ?config.cors.frontend_origin,
            "Initialized upstream client"
        );

        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(config, upstream));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the process is killed.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(port = self.port, "Starting neo-relay");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                tracing::error!("Server error: {}", e);
                e
            })
    }
}
