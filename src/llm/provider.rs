// src/llm/provider.rs
// Capability traits for completion and HTML conversion backends

use anyhow::Result;
use async_trait::async_trait;

use super::{ChatMessage, CompletionResponse, ConversionResult, NamedBlob};

/// Text completion backend
#[async_trait]
pub trait CompletionCapability: Send + Sync {
    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Run a chat completion against `model`
    async fn run(&self, model: &str, messages: &[ChatMessage]) -> Result<CompletionResponse>;
}

/// HTML to markdown conversion backend
#[async_trait]
pub trait MarkdownConverter: Send + Sync {
    async fn to_markdown(&self, blob: NamedBlob) -> Result<ConversionResult>;
}
