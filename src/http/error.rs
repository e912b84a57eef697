//! Error envelope returned to callers.
//!
//! Every failure is rendered as `{"error": ...}` with an optional `detail`.
//! Upstream failures of any kind collapse into a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Origin filter rejected the request.
    #[error("{0}")]
    Forbidden(String),

    /// The upstream call failed; `label` names the upstream operation.
    #[error("{label}: {source}")]
    Upstream {
        label: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// The inbound request could not be forwarded as-is.
    #[error("{error}: {detail}")]
    BadRequest { error: &'static str, detail: String },

    /// The inbound body exceeded `security.max_body_size`.
    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Forbidden(message) => ErrorBody {
                error: message,
                detail: None,
            },
            ApiError::Upstream { label, source } => ErrorBody {
                error: label,
                detail: Some(source.to_string()),
            },
            ApiError::BadRequest { error, detail } => ErrorBody {
                error,
                detail: Some(detail.clone()),
            },
            ApiError::PayloadTooLarge(detail) => ErrorBody {
                error: "Payload Too Large",
                detail: Some(detail.clone()),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_forbidden_has_error_only() {
        let (status, body) = render(ApiError::Forbidden("Access denied".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Access denied" }));
    }

    #[tokio::test]
    async fn test_upstream_has_error_and_detail() {
        let err = ApiError::Upstream {
            label: "Hypixel Error",
            source: UpstreamError::Status {
                status: 502,
                message: "Request failed with status code 502".into(),
            },
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Hypixel Error",
                "detail": "Request failed with status code 502",
            })
        );
    }

    #[tokio::test]
    async fn test_bad_request() {
        let err = ApiError::BadRequest {
            error: "Invalid JSON body",
            detail: "EOF while parsing a value at line 1 column 0".into(),
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let err = ApiError::PayloadTooLarge("length limit exceeded".into());
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body,
            json!({ "error": "Payload Too Large", "detail": "length limit exceeded" })
        );
    }
}
