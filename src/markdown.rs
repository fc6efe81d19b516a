//! Page fetching and markdown normalization
//!
//! Fetches a URL and produces a bounded markdown excerpt. Sites serving
//! `text/markdown` (markdown for agents) are used as-is; HTML is handed to a
//! [`MarkdownConverter`]. Every failure degrades to `None`.

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::http::FETCH_TIMEOUT;
use crate::llm::{MarkdownConverter, NamedBlob};
use crate::utils::truncate_chars;

/// Maximum characters of page content handed to the model
pub const MAX_MARKDOWN_CHARS: usize = 4096;

/// Accept header preferring markdown, then HTML, then anything
pub const ACCEPT_MARKDOWN: &str = "text/markdown, text/html;q=0.9, */*;q=0.8";

/// Caller-supplied headers to forward on the page fetch.
///
/// Entries with no value are dropped when the request is built.
#[derive(Debug, Clone, Default)]
pub struct ForwardedHeaders(Vec<(String, Option<String>)>);

impl ForwardedHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the outbound header map, skipping undefined values and entries
    /// that are not valid HTTP headers. The Accept header always wins.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.0 {
            let Some(value) = value else {
                continue;
            };
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.append(name, value);
                }
                _ => debug!(header = %name, "Skipping header that cannot be forwarded"),
            }
        }
        map.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MARKDOWN));
        map
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for ForwardedHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }
}

/// Fetch `url` and return at most [`MAX_MARKDOWN_CHARS`] characters of markdown.
///
/// Returns `None` when the page is unreachable, empty, of an unsupported
/// type, or cannot be converted. Failures are logged, never returned.
pub async fn fetch_page_markdown(
    client: &Client,
    url: &str,
    headers: &ForwardedHeaders,
    converter: Option<&dyn MarkdownConverter>,
) -> Option<String> {
    let (content_type, body) = match fetch_page(client, url, headers).await {
        Ok(page) => page,
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to fetch page");
            return None;
        }
    };

    if body.is_empty() {
        debug!(url = %url, "Page body is empty");
        return None;
    }

    if content_type.contains("text/markdown") {
        return Some(truncate_chars(&body, MAX_MARKDOWN_CHARS).to_string());
    }

    if content_type.contains("text/html") {
        let Some(converter) = converter else {
            warn!(url = %url, "No markdown converter available for HTML page");
            return None;
        };

        return match converter.to_markdown(NamedBlob::html_page(body)).await {
            Ok(result) if result.is_markdown() => match result.data.as_deref() {
                Some(data) if !data.is_empty() => {
                    Some(truncate_chars(data, MAX_MARKDOWN_CHARS).to_string())
                }
                _ => None,
            },
            Ok(result) => {
                warn!(url = %url, output_format = %result.format, "Markdown conversion returned unexpected format");
                None
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Markdown conversion failed");
                None
            }
        };
    }

    debug!(url = %url, content_type = %content_type, "Unsupported content type");
    None
}

/// GET the page, returning its lowercased content type and body text
async fn fetch_page(
    client: &Client,
    url: &str,
    headers: &ForwardedHeaders,
) -> reqwest::Result<(String, String)> {
    let response = client
        .get(url)
        .headers(headers.to_header_map())
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    let body = response.text().await?;
    Ok((content_type, body))
}
