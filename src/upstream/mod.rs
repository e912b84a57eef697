//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → stats.rs / store.rs (build URL, inject credential)
//!     → client.rs (send, check status, check JSON)
//!     → Bytes relayed to caller, or UpstreamError
//! ```

pub mod client;
pub mod error;
pub mod stats;
pub mod store;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use stats::StatsApi;
pub use store::DocumentStore;
