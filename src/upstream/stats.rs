//! Stats API (guild and player lookups).
//!
//! The API key travels as the `key` query parameter, so URLs built here must
//! never be logged or echoed back to callers.

use axum::body::Bytes;
use url::Url;

use crate::config::Secret;
use crate::upstream::client::{endpoint, parse_base, UpstreamClient};
use crate::upstream::error::UpstreamError;

#[derive(Clone, Debug)]
pub struct StatsApi {
    base: Url,
    api_key: Secret,
}

impl StatsApi {
    pub fn new(base_url: &str, api_key: Secret) -> Result<Self, UpstreamError> {
        Ok(Self {
            base: parse_base(base_url)?,
            api_key,
        })
    }

    /// `GET {base}/guild?name=<name>&key=<key>`
    pub fn guild_url(&self, name: &str) -> Url {
        let mut url = endpoint(&self.base, &["guild"]);
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("key", self.api_key.expose());
        url
    }

    /// `GET {base}/player?key=<key>&uuid=<uuid>`
    pub fn player_url(&self, uuid: &str) -> Url {
        let mut url = endpoint(&self.base, &["player"]);
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose())
            .append_pair("uuid", uuid);
        url
    }

    pub async fn guild(&self, client: &UpstreamClient, name: &str) -> Result<Bytes, UpstreamError> {
        client.relay_json(client.get(self.guild_url(name))).await
    }

    pub async fn player(&self, client: &UpstreamClient, uuid: &str) -> Result<Bytes, UpstreamError> {
        client.relay_json(client.get(self.player_url(uuid))).await
    }
}
