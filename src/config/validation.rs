//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that credentials are present
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that the access policy has something to match against
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;
use crate::security::access_control::AccessPolicy;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("credential `{0}` is missing")]
    MissingCredential(&'static str),

    #[error("credential `{0}` cannot be sent as an HTTP header value")]
    UnprintableCredential(&'static str),

    #[error("`{field}` is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("access policy `{0}` requires at least one allowed origin")]
    EmptyAllowList(AccessPolicy),

    #[error("allowed origin is not an http(s) origin: {0}")]
    InvalidOrigin(String),

    #[error("`{0}` must be greater than zero")]
    ZeroValue(&'static str),

    #[error("timeouts.upstream_secs ({upstream_secs}) must be below timeouts.request_secs ({request_secs})")]
    UpstreamTimeoutTooLong { upstream_secs: u64, request_secs: u64 },
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.credentials.stats_api_key.is_empty() {
        errors.push(ValidationError::MissingCredential("HYPIXEL_API_KEY"));
    }
    if config.credentials.store_master_key.is_empty() {
        errors.push(ValidationError::MissingCredential("JSONBIN_KEY"));
    } else if HeaderValue::from_str(config.credentials.store_master_key.expose()).is_err() {
        errors.push(ValidationError::UnprintableCredential("JSONBIN_KEY"));
    }

    for (field, value) in [
        ("upstreams.stats_base_url", &config.upstreams.stats_base_url),
        ("upstreams.store_base_url", &config.upstreams.store_base_url),
    ] {
        if !is_http_url(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let policy = config.access.policy;
    if policy.checks_headers() && config.access.allowed_origins.is_empty() {
        errors.push(ValidationError::EmptyAllowList(policy));
    }
    for origin in &config.access.allowed_origins {
        if !is_http_url(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.upstream_secs"));
    } else if config.timeouts.upstream_secs >= config.timeouts.request_secs {
        errors.push(ValidationError::UpstreamTimeoutTooLong {
            upstream_secs: config.timeouts.upstream_secs,
            request_secs: config.timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::Secret;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.credentials.stats_api_key = Secret::new("stats-key");
        config.credentials.store_master_key = Secret::new("master-key");
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_default_config_lacks_credentials() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingCredential("HYPIXEL_API_KEY"),
                ValidationError::MissingCredential("JSONBIN_KEY"),
            ]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.listener.port = 0;
        config.upstreams.store_base_url = "ftp://files.example".into();
        config.security.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroPort));
    }

    #[test]
    fn test_strict_policy_needs_origins() {
        let mut config = valid_config();
        config.access.allowed_origins.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyAllowList(AccessPolicy::Strict)]);

        config.access.policy = AccessPolicy::Open;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_upstream_timeout_must_undercut_request_timeout() {
        let mut config = valid_config();
        config.timeouts.request_secs = 10;
        config.timeouts.upstream_secs = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UpstreamTimeoutTooLong {
                upstream_secs: 10,
                request_secs: 10,
            }]
        );

        config.timeouts.upstream_secs = 9;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_master_key_unusable_as_header() {
        let mut config = valid_config();
        config.credentials.store_master_key = Secret::new("line\nbreak");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnprintableCredential("JSONBIN_KEY")]);
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let mut config = valid_config();
        config.access.allowed_origins.push("mattisweb.de".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidOrigin("mattisweb.de".into())]);
    }
}
