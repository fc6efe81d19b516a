// src/llm/workers_ai.rs
// Cloudflare Workers AI REST client (chat completions + toMarkdown)

use super::{
    ChatMessage, CompletionCapability, CompletionResponse, ConversionResult, MarkdownConverter,
    NamedBlob,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

/// Workers AI REST API root for an account
pub fn default_base_url(account_id: &str) -> String {
    format!("https://api.cloudflare.com/client/v4/accounts/{account_id}/ai")
}

/// Cloudflare API response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// One converted document from the toMarkdown endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkdownDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct WorkersAiClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl WorkersAiClient {
    pub fn new(client: Client, account_id: &str, api_token: String) -> Self {
        Self::with_base_url(client, default_base_url(account_id), api_token)
    }

    /// Point the client at a custom API root (gateways, local mocks)
    pub fn with_base_url(client: Client, base_url: impl Into<String>, api_token: String) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decode a Cloudflare envelope, surfacing API-level failures as errors
    async fn read_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!("Workers AI {} error {}: {}", endpoint, status, body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Workers AI {} returned invalid JSON: {}", endpoint, e))?;

        if !envelope.success {
            let details = envelope
                .errors
                .iter()
                .map(|e| match e.code {
                    Some(code) => format!("{} ({})", e.message, code),
                    None => e.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow!("Workers AI {} failed: {}", endpoint, details));
        }

        envelope
            .result
            .ok_or_else(|| anyhow!("Workers AI {} returned no result", endpoint))
    }
}

#[async_trait]
impl CompletionCapability for WorkersAiClient {
    fn name(&self) -> &'static str {
        "workers-ai"
    }

    async fn run(&self, model: &str, messages: &[ChatMessage]) -> Result<CompletionResponse> {
        let start = Instant::now();
        let url = format!("{}/run/{}", self.base_url, model);

        debug!(model = %model, messages = messages.len(), "Workers AI run request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "messages": messages }))
            .send()
            .await?;

        let result: CompletionResponse = self.read_envelope("run", response).await?;

        debug!(
            model = %model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Workers AI run complete"
        );

        Ok(result)
    }
}

#[async_trait]
impl MarkdownConverter for WorkersAiClient {
    async fn to_markdown(&self, blob: NamedBlob) -> Result<ConversionResult> {
        let url = format!("{}/tomarkdown", self.base_url);
        let size = blob.data.len();

        let part = Part::bytes(blob.data)
            .file_name(blob.name.clone())
            .mime_str(&blob.mime_type)?;
        let form = Form::new().part("files", part);

        debug!(name = %blob.name, bytes = size, "Workers AI toMarkdown request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await?;

        let documents: Vec<MarkdownDocument> = self.read_envelope("tomarkdown", response).await?;
        let document = documents
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Workers AI toMarkdown returned no documents"))?;

        if let Some(error) = document.error {
            return Err(anyhow!("toMarkdown failed for {}: {}", document.name, error));
        }

        Ok(ConversionResult {
            format: document.format,
            data: document.data,
        })
    }
}
