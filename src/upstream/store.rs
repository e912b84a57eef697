//! Document store (bin read and replace).
//!
//! The master key is sent only as the `X-Master-Key` header, never in the URL.

use axum::body::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use url::Url;

use crate::config::Secret;
use crate::upstream::client::{endpoint, parse_base, UpstreamClient};
use crate::upstream::error::UpstreamError;

pub const X_MASTER_KEY: &str = "X-Master-Key";

#[derive(Clone, Debug)]
pub struct DocumentStore {
    base: Url,
    master_key: Secret,
}

impl DocumentStore {
    pub fn new(base_url: &str, master_key: Secret) -> Result<Self, UpstreamError> {
        Ok(Self {
            base: parse_base(base_url)?,
            master_key,
        })
    }

    /// `{base}/v3/b/<id>/latest`
    pub fn latest_url(&self, id: &str) -> Url {
        endpoint(&self.base, &["v3", "b", id, "latest"])
    }

    /// `{base}/v3/b/<id>`
    pub fn bin_url(&self, id: &str) -> Url {
        endpoint(&self.base, &["v3", "b", id])
    }

    fn master_key_header(&self) -> Result<HeaderValue, UpstreamError> {
        let mut value = HeaderValue::from_str(self.master_key.expose())
            .map_err(|_| UpstreamError::InvalidCredential)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Fetch the latest version of a bin.
    pub async fn read(&self, client: &UpstreamClient, id: &str) -> Result<Bytes, UpstreamError> {
        let request = client
            .get(self.latest_url(id))
            .header(X_MASTER_KEY, self.master_key_header()?);
        client.relay_json(request).await
    }

    /// Replace a bin's content with `document`, forwarded byte-for-byte.
    pub async fn write(
        &self,
        client: &UpstreamClient,
        id: &str,
        document: Bytes,
    ) -> Result<Bytes, UpstreamError> {
        let request = client
            .put(self.bin_url(id))
            .header(X_MASTER_KEY, self.master_key_header()?)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(document);
        client.relay_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DocumentStore {
        DocumentStore::new("https://api.jsonbin.io", Secret::new("master-key")).unwrap()
    }

    #[test]
    fn test_urls_never_carry_master_key() {
        let store = store();
        let latest = store.latest_url("abc");
        let bin = store.bin_url("abc");

        assert_eq!(latest.as_str(), "https://api.jsonbin.io/v3/b/abc/latest");
        assert_eq!(bin.as_str(), "https://api.jsonbin.io/v3/b/abc");
        assert!(!latest.as_str().contains("master-key"));
        assert!(!bin.as_str().contains("master-key"));
    }

    #[test]
    fn test_master_key_header_is_sensitive() {
        let value = store().master_key_header().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value, "master-key");
    }

    #[test]
    fn test_unprintable_master_key_is_rejected() {
        let store = DocumentStore::new("https://api.jsonbin.io", Secret::new("bad\nkey")).unwrap();
        assert!(matches!(
            store.master_key_header(),
            Err(UpstreamError::InvalidCredential)
        ));
    }
}
