// src/web/api.rs
// REST handlers

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::error::SlugError;
use crate::markdown::ForwardedHeaders;
use crate::slug::{SlugPayload, generate_slug};
use crate::web::state::AppState;

/// Incoming headers that are never forwarded to the fetched page
const SKIP_FORWARD: &[&str] = &[
    "host",
    "content-length",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
    "authorization",
    "cookie",
    "accept",
    "accept-encoding",
];

#[derive(Debug, Deserialize)]
pub struct AiQuery {
    pub url: Option<String>,
}

impl IntoResponse for SlugError {
    fn into_response(self) -> Response {
        let status = match &self {
            SlugError::CapabilityUnavailable => StatusCode::NOT_IMPLEMENTED,
            SlugError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SlugError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() && !self.is_capability_unavailable() {
            error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (status, body).into_response()
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/link/ai?url=...
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AiQuery>,
) -> Result<Json<SlugPayload>, SlugError> {
    let url = validate_url(query.url.as_deref())?;

    let payload = generate_slug(
        &url,
        state.completion.as_deref(),
        state.converter.as_deref(),
        &state.client,
        &forwardable_headers(&headers),
        &state.settings,
    )
    .await?;

    Ok(Json(payload))
}

/// Require an absolute http(s) URL
pub fn validate_url(raw: Option<&str>) -> Result<String, SlugError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SlugError::InvalidInput("url is required".to_string()))?;

    let parsed = url::Url::parse(raw).map_err(|e| {
        warn!(url = %raw, error = %e, "Rejected invalid url");
        SlugError::InvalidInput(format!("invalid url '{}': {}", raw, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        scheme => Err(SlugError::InvalidInput(format!(
            "unsupported url scheme '{}'",
            scheme
        ))),
    }
}

/// Request headers to pass through to the page fetch. Values that are not
/// valid UTF-8 count as undefined.
pub fn forwardable_headers(headers: &HeaderMap) -> ForwardedHeaders {
    headers
        .iter()
        .filter(|(name, _)| !SKIP_FORWARD.contains(&name.as_str()))
        .map(|(name, value)| (name.as_str(), value.to_str().ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_validate_url_ok() {
        assert_eq!(
            validate_url(Some("https://sink.cool/")).unwrap(),
            "https://sink.cool/"
        );
        assert_eq!(
            validate_url(Some(" http://example.com/a?b=c ")).unwrap(),
            "http://example.com/a?b=c"
        );
    }

    #[test]
    fn test_validate_url_missing() {
        assert!(matches!(validate_url(None), Err(SlugError::InvalidInput(_))));
        assert!(matches!(validate_url(Some("  ")), Err(SlugError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_url_rejects_relative_and_other_schemes() {
        assert!(validate_url(Some("/relative/path")).is_err());
        assert!(validate_url(Some("not a url")).is_err());
        let err = validate_url(Some("ftp://example.com/file")).unwrap_err();
        assert!(err.to_string().contains("unsupported url scheme"));
    }

    #[test]
    fn test_forwardable_headers_filters() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("linkslug.local"));
        headers.insert("authorization", HeaderValue::from_static("Bearer secret"));
        headers.insert("cookie", HeaderValue::from_static("a=b"));
        headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));
        headers.insert("accept-language", HeaderValue::from_static("en"));
        headers.insert("x-binary", HeaderValue::from_bytes(b"\xff\xfe").unwrap());

        let forwarded = forwardable_headers(&headers);
        assert_eq!(forwarded.len(), 3);

        let map = forwarded.to_header_map();
        assert_eq!(map["user-agent"], "Mozilla/5.0");
        assert_eq!(map["accept-language"], "en");
        assert!(map.get("host").is_none());
        assert!(map.get("authorization").is_none());
        assert!(map.get("cookie").is_none());
        assert!(map.get("x-binary").is_none());
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (SlugError::CapabilityUnavailable, StatusCode::NOT_IMPLEMENTED),
            (SlugError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (SlugError::Unauthorized, StatusCode::UNAUTHORIZED),
            (SlugError::Llm("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
