//! Upstream relay library.
//!
//! Forwards browser calls to the stats API and the document store, injecting
//! server-held keys and enforcing an origin allow-list.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
