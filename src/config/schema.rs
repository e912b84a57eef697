//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::secret::Secret;
use crate::security::access_control::AccessPolicy;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Base URLs of the third-party APIs.
    pub upstreams: UpstreamConfig,

    /// Server-held credentials injected into outbound requests.
    pub credentials: CredentialsConfig,

    /// Origin-based access control.
    pub access: AccessConfig,

    /// Optional endpoints.
    pub features: FeatureConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `PORT`.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream base URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Stats API (guild and player lookups).
    pub stats_base_url: String,

    /// Document store (bin read/replace).
    pub store_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            stats_base_url: "https://api.hypixel.net".to_string(),
            store_base_url: "https://api.jsonbin.io".to_string(),
        }
    }
}

/// Credentials. Usually supplied through the environment rather than the file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Stats API key, sent as the `key` query parameter.
    pub stats_api_key: Secret,

    /// Document store master key, sent only as the `X-Master-Key` header.
    pub store_master_key: Secret,
}

/// Access control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Which admission policy to enforce.
    pub policy: AccessPolicy,

    /// Origin prefixes allowed to call the relay.
    pub allowed_origins: Vec<String>,

    /// Message placed in the 403 body.
    pub rejection_message: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            policy: AccessPolicy::Strict,
            allowed_origins: vec![
                "https://mattisweb.de".to_string(),
                "https://hyper-b.mattisweb.de".to_string(),
            ],
            rejection_message:
                "Access only allowed via mattisweb.de or hyper-b.mattisweb.de".to_string(),
        }
    }
}

/// Optional endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Mount `GET /api/player`.
    pub player_lookup: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            player_lookup: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an inbound request, in seconds.
    pub request_secs: u64,

    /// Per-call upstream timeout in seconds. Must stay below `request_secs`
    /// so a hung upstream ends in the 500 envelope rather than a bare 408.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 25,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 100 * 1024, // 100KB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "upstream_relay=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
