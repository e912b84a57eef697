//! Access Control Middleware.
//! Admits or rejects requests based on their `Origin` / `Referer` headers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::AccessConfig;
use crate::http::error::ApiError;
use crate::observability::metrics;

/// Admission policy, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// `Origin` or `Referer` must start with an allowed origin. Headerless callers are rejected.
    #[default]
    Strict,
    /// Like `Strict`, but a request carrying neither header is admitted.
    Lenient,
    /// No explicit check; only the CORS layer restricts browser callers.
    CorsOnly,
    /// No restriction at all.
    Open,
}

impl AccessPolicy {
    /// Whether the explicit header check runs under this policy.
    pub fn checks_headers(self) -> bool {
        matches!(self, AccessPolicy::Strict | AccessPolicy::Lenient)
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessPolicy::Strict => "strict",
            AccessPolicy::Lenient => "lenient",
            AccessPolicy::CorsOnly => "cors_only",
            AccessPolicy::Open => "open",
        })
    }
}

impl FromStr for AccessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(AccessPolicy::Strict),
            "lenient" => Ok(AccessPolicy::Lenient),
            "cors_only" => Ok(AccessPolicy::CorsOnly),
            "open" | "none" => Ok(AccessPolicy::Open),
            other => Err(format!(
                "unknown access policy `{other}` (expected strict, lenient, cors_only or open)"
            )),
        }
    }
}

/// Outcome of evaluating a request against the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject,
}

/// Origin allow-list check.
#[derive(Debug, Clone)]
pub struct OriginFilter {
    policy: AccessPolicy,
    allowed_origins: Vec<String>,
    rejection_message: String,
}

impl OriginFilter {
    pub fn new(
        policy: AccessPolicy,
        allowed_origins: Vec<String>,
        rejection_message: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            allowed_origins,
            rejection_message: rejection_message.into(),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(
            config.policy,
            config.allowed_origins.clone(),
            config.rejection_message.clone(),
        )
    }

    /// Decide whether a request with the given headers is admitted.
    ///
    /// Empty header values are treated the same as absent ones.
    pub fn evaluate(&self, origin: Option<&str>, referer: Option<&str>) -> Verdict {
        let origin = origin.filter(|v| !v.is_empty());
        let referer = referer.filter(|v| !v.is_empty());

        match self.policy {
            AccessPolicy::CorsOnly | AccessPolicy::Open => Verdict::Admit,
            AccessPolicy::Lenient if origin.is_none() && referer.is_none() => Verdict::Admit,
            AccessPolicy::Strict | AccessPolicy::Lenient => {
                let allowed = self.allowed_origins.iter().any(|allowed| {
                    origin.is_some_and(|o| o.starts_with(allowed.as_str()))
                        || referer.is_some_and(|r| r.starts_with(allowed.as_str()))
                });
                if allowed {
                    Verdict::Admit
                } else {
                    Verdict::Reject
                }
            }
        }
    }

    /// Evaluate against a request's header map. Non-UTF-8 values count as absent.
    pub fn evaluate_headers(&self, headers: &HeaderMap) -> Verdict {
        let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
        let referer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());
        self.evaluate(origin, referer)
    }
}

pub async fn access_control_middleware(
    State(filter): State<Arc<OriginFilter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match filter.evaluate_headers(req.headers()) {
        Verdict::Admit => next.run(req).await,
        Verdict::Reject => {
            tracing::warn!(
                policy = %filter.policy,
                path = %req.uri().path(),
                origin = ?req.headers().get(header::ORIGIN),
                referer = ?req.headers().get(header::REFERER),
                "Rejected request from disallowed origin"
            );
            metrics::record_rejection();
            ApiError::Forbidden(filter.rejection_message.clone()).into_response()
        }
    }
}
