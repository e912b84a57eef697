//! CORS layer construction.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::security::access_control::AccessPolicy;

/// Build the CORS layer for the configured policy.
///
/// Every policy except `Open` only answers with `Access-Control-Allow-Origin`
/// for exact allow-list entries, so other browser origins are refused by the
/// browser itself.
pub fn cors_layer(policy: AccessPolicy, allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = match policy {
        AccessPolicy::Open => AllowOrigin::any(),
        _ => {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|o| o.trim_end_matches('/').parse().ok())
                .collect();
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(policy: AccessPolicy) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(policy, &["https://mattisweb.de".to_string()]))
    }

    async fn allow_origin_for(policy: AccessPolicy, origin: &str) -> Option<HeaderValue> {
        let response = app(policy)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().get("access-control-allow-origin").cloned()
    }

    #[tokio::test]
    async fn test_allow_listed_origin_gets_header() {
        let value = allow_origin_for(AccessPolicy::CorsOnly, "https://mattisweb.de").await;
        assert_eq!(value.unwrap(), "https://mattisweb.de");
    }

    #[tokio::test]
    async fn test_foreign_origin_gets_no_header() {
        assert!(allow_origin_for(AccessPolicy::Strict, "https://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn test_open_policy_allows_any_origin() {
        let value = allow_origin_for(AccessPolicy::Open, "https://evil.example").await;
        assert_eq!(value.unwrap(), "*");
    }
}
