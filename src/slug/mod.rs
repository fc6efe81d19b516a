// src/slug/mod.rs
// Slug generation: page context -> few-shot prompt -> completion -> payload

mod extract;
mod prompt;

pub use extract::{parse_loose, strip_code_fence};
pub use prompt::{EXEMPLARS, SLUG_REGEX_PLACEHOLDER, build_messages, system_prompt, user_content};

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{EnvConfig, SlugPattern};
use crate::error::{Result, SlugError};
use crate::llm::{CompletionCapability, CompletionResponse, MarkdownConverter};
use crate::markdown::{ForwardedHeaders, fetch_page_markdown};

/// Model, prompt and slug format used for generation
#[derive(Debug, Clone)]
pub struct SlugSettings {
    pub model: String,
    /// System prompt containing a `{slugRegex}` placeholder
    pub prompt_template: String,
    pub slug_pattern: SlugPattern,
}

impl SlugSettings {
    pub fn from_config(config: &EnvConfig) -> Result<Self> {
        Ok(Self {
            model: config.ai_model.clone(),
            prompt_template: config.ai_prompt.clone(),
            slug_pattern: config.slug_pattern()?,
        })
    }
}

/// Whatever the model answered, loosely parsed.
///
/// Usually `{"slug": "..."}`, but nothing is enforced; callers validate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlugPayload(Value);

impl SlugPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The `slug` field when the payload is an object carrying a string slug
    pub fn slug(&self) -> Option<&str> {
        self.0.get("slug").and_then(Value::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Turn a raw completion into a payload: normalize the response shape,
/// unwrap a fenced block, loose-parse.
pub fn extract_payload(response: &CompletionResponse) -> SlugPayload {
    let content = strip_code_fence(response.text());
    SlugPayload(parse_loose(content))
}

/// Generate a slug payload for `url`.
///
/// Fails only when no completion capability is configured or the completion
/// call itself errors. Page fetch and conversion problems fall back to
/// prompting with the bare URL.
pub async fn generate_slug(
    url: &str,
    completion: Option<&dyn CompletionCapability>,
    converter: Option<&dyn MarkdownConverter>,
    client: &Client,
    headers: &ForwardedHeaders,
    settings: &SlugSettings,
) -> Result<SlugPayload> {
    let Some(completion) = completion else {
        return Err(SlugError::CapabilityUnavailable);
    };

    let markdown = fetch_page_markdown(client, url, headers, converter).await;
    debug!(
        url = %url,
        markdown_chars = markdown.as_ref().map(|m| m.chars().count()),
        "Page context fetched"
    );

    let messages = build_messages(
        system_prompt(&settings.prompt_template, &settings.slug_pattern),
        user_content(url, markdown.as_deref()),
    );

    let response = completion
        .run(&settings.model, &messages)
        .await
        .map_err(|e| SlugError::Llm(format!("{} completion failed: {:#}", completion.name(), e)))?;

    let payload = extract_payload(&response);
    info!(url = %url, slug = ?payload.slug(), "Slug generated");
    Ok(payload)
}
