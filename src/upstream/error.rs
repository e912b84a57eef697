//! Error types for upstream calls.

use std::error::Error as _;

use thiserror::Error;

/// Longest upstream error body echoed back in a `detail` field.
pub const MAX_DETAIL_BODY: usize = 512;

/// Errors that can occur when talking to an upstream API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Network, DNS, TLS or timeout failure. The message never contains the URL.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Upstream answered 2xx, but the body is not JSON.
    #[error("Upstream returned a non-JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// A configured credential cannot be carried in an HTTP header.
    #[error("Configured credential is not a valid header value")]
    InvalidCredential,

    /// A configured base URL cannot have paths appended to it.
    #[error("Invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),

    /// The shared HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

impl UpstreamError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        // The stats URL carries the API key; drop it before the error is rendered.
        let err = err.without_url();
        let mut message = err.to_string();
        let mut cause = err.source();
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        UpstreamError::Transport {
            message,
            source: err,
        }
    }

    pub(crate) fn status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let mut message = format!("Request failed with status code {}", status.as_u16());
        let text = String::from_utf8_lossy(body);
        let text = text.trim();
        if !text.is_empty() {
            message.push_str(": ");
            message.push_str(truncate(text, MAX_DETAIL_BODY));
        }
        UpstreamError::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// Upstream status, when the upstream answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
