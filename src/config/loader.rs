//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::secret::Secret;
use crate::config::validation::{validate_config, ValidationError};
use crate::security::access_control::AccessPolicy;

pub const ENV_STATS_API_KEY: &str = "HYPIXEL_API_KEY";
pub const ENV_STORE_MASTER_KEY: &str = "JSONBIN_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ACCESS_POLICY: &str = "RELAY_ACCESS_POLICY";
pub const ENV_ALLOWED_ORIGINS: &str = "RELAY_ALLOWED_ORIGINS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration, without validating it.
pub fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so the overlay can be exercised without
/// touching the process environment.
pub fn apply_env<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_STATS_API_KEY) {
        config.credentials.stats_api_key = Secret::new(key);
    }
    if let Some(key) = lookup(ENV_STORE_MASTER_KEY) {
        config.credentials.store_master_key = Secret::new(key);
    }

    if let Some(port) = lookup(ENV_PORT) {
        config.listener.port = port.trim().parse::<u16>().map_err(|e| ConfigError::Env {
            var: ENV_PORT,
            reason: format!("{e}"),
        })?;
    }

    if let Some(policy) = lookup(ENV_ACCESS_POLICY) {
        config.access.policy = policy.parse::<AccessPolicy>().map_err(|reason| ConfigError::Env {
            var: ENV_ACCESS_POLICY,
            reason,
        })?;
    }

    if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
        config.access.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(())
}

/// Build the startup configuration: defaults, then the optional file, then
/// the process environment. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RelayConfig::default(),
    };

    apply_env(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
