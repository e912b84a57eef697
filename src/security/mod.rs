//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answers, allow-origin headers)
//!     → access_control.rs (Origin / Referer allow-list, 403 on reject)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - One named policy, chosen by configuration
//! - Fail closed: the default policy rejects headerless callers
//! - Secrets only leave the process inside outbound requests

pub mod access_control;
pub mod cors;

pub use access_control::{AccessPolicy, OriginFilter, Verdict};
