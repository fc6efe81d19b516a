// src/llm/mod.rs
// LLM capabilities (completion + HTML conversion) and the Workers AI client

mod provider;
mod types;
mod workers_ai;

pub use provider::{CompletionCapability, MarkdownConverter};
pub use types::{
    ChatMessage, Choice, ChoiceMessage, CompletionResponse, ConversionResult, NamedBlob, Role,
};
pub use workers_ai::{WorkersAiClient, default_base_url};
