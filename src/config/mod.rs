//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! RelayConfig::default()
//!     → loader.rs (optional TOML file, then environment overlay)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; secrets are read exactly once at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AccessConfig;
pub use schema::RelayConfig;
pub use schema::UpstreamConfig;
pub use secret::Secret;
