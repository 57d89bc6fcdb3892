//! Outbound client for the two upstream APIs.
//!
//! Each call makes exactly one request, injects the server-held key and hands
//! back the upstream status with the raw body. Bodies are checked to be JSON but
//! never re-serialized, so they reach the browser byte-for-byte.

use crate::config::{GeminiConfig, NasaConfig};
use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::Serialize;
use service_core::observability::TracedClientExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("Upstream returned a non-JSON body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

// reqwest errors embed the request URL, which carries the API key.
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.without_url())
    }
}

/// Status and body of an upstream reply, relayed unchanged.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Query forwarded to the NeoWs feed endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FeedQuery {
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

pub struct UpstreamClient {
    client: Client,
    nasa: NasaConfig,
    gemini: GeminiConfig,
}

impl UpstreamClient {
    pub fn new(nasa: NasaConfig, gemini: GeminiConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent(concat!("neo-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            nasa,
            gemini,
        })
    }

    /// `GET {nasa}/feed?start_date=..[&end_date=..]&api_key=..`
    pub async fn neo_feed(
        &self,
        query: &FeedQuery,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.feed_url()?;

        tracing::debug!(
            start_date = %query.start_date,
            end_date = ?query.end_date,
            "Requesting NeoWs feed"
        );

        let response = self
            .client
            .traced_get(url)
            .query(query)
            .query(&[("api_key", self.nasa.api_key.expose_secret())])
            .send_with_request_id(request_id)
            .await?;

        into_upstream_response(response).await
    }

    /// `GET {nasa}/neo/{id}?api_key=..`
    pub async fn neo_lookup(
        &self,
        id: &str,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.lookup_url(id)?;

        tracing::debug!(asteroid_id = %id, "Requesting NeoWs lookup");

        let response = self
            .client
            .traced_get(url)
            .query(&[("api_key", self.nasa.api_key.expose_secret())])
            .send_with_request_id(request_id)
            .await?;

        into_upstream_response(response).await
    }

    /// `POST {gemini}/models/{model}:generateContent?key=..` with `body` as-is.
    pub async fn generate_content(
        &self,
        body: Bytes,
        request_id: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.generate_content_url()?;

        tracing::debug!(
            model = %self.gemini.model,
            body_len = body.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .traced_post(url)
            .query(&[("key", self.gemini.api_key.expose_secret())])
            .header("content-type", "application/json")
            .body(body)
            .send_with_request_id(request_id)
            .await?;

        into_upstream_response(response).await
    }

    fn feed_url(&self) -> Result<Url, UpstreamError> {
        build_url(&self.nasa.base_url, &["feed"])
    }

    fn lookup_url(&self, id: &str) -> Result<Url, UpstreamError> {
        build_url(&self.nasa.base_url, &["neo", id])
    }

    fn generate_content_url(&self) -> Result<Url, UpstreamError> {
        let method = format!("{}:generateContent", self.gemini.model);
        build_url(&self.gemini.base_url, &["models", &method])
    }
}

/// Append `segments` to `base`, percent-encoding each one.
fn build_url(base: &str, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidUrl(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn into_upstream_response(
    response: reqwest::Response,
) -> Result<UpstreamResponse, UpstreamError> {
    let status = response.status();
    let body = response.bytes().await?;

    serde_json::from_slice::<serde::de::IgnoredAny>(&body).map_err(UpstreamError::InvalidBody)?;

    Ok(UpstreamResponse { status, body })
}
