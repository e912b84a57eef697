//! Shared outbound HTTP client.
//!
//! # Responsibilities
//! - Own the pooled `reqwest::Client` used for every upstream call
//! - Apply the per-call timeout
//! - Turn an upstream response into relayable JSON bytes or an `UpstreamError`
//!
//! # Design Decisions
//! - No retries: one inbound request triggers exactly one outbound call
//! - Success bodies are relayed as received, only checked to be JSON

use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use url::Url;

use crate::upstream::error::UpstreamError;

/// Pooled upstream HTTP client.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .user_agent(concat!("upstream-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self { http, timeout })
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).timeout(self.timeout)
    }

    pub fn put(&self, url: Url) -> RequestBuilder {
        self.http.put(url).timeout(self.timeout)
    }

    /// Send `request` and return the upstream JSON body unchanged.
    pub async fn relay_json(&self, request: RequestBuilder) -> Result<Bytes, UpstreamError> {
        let response = request.send().await.map_err(UpstreamError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(UpstreamError::transport)?;

        if !status.is_success() {
            return Err(UpstreamError::status(status, &body));
        }

        serde_json::from_slice::<IgnoredAny>(&body)?;
        Ok(body)
    }
}

/// Validate a configured base URL.
pub(crate) fn parse_base(base: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(base).map_err(|e| UpstreamError::InvalidBaseUrl(format!("{base}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(UpstreamError::InvalidBaseUrl(base.to_string()));
    }
    Ok(url)
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
