pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use config::RelayConfig;
use services::UpstreamClient;
use std::sync::Arc;

/// Shared application state: immutable config plus the outbound client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: RelayConfig, upstream: UpstreamClient) -> Self {
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}
