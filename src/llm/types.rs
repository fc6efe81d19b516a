// src/llm/types.rs
// Wire types shared by completion and conversion capabilities

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message format for completion calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Raw completion result.
///
/// Models answer either with a direct `response` string or with an
/// OpenAI-style `choices` list; only one is populated per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Response carrying a direct `response` string
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            choices: None,
        }
    }

    /// Response carrying a single OpenAI-style choice
    pub fn from_choice(content: impl Into<String>) -> Self {
        Self {
            response: None,
            choices: Some(vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.into()),
                }),
            }]),
        }
    }

    /// Normalize to a single string: `response`, then the first choice's
    /// message content, then empty.
    pub fn text(&self) -> &str {
        if let Some(response) = &self.response {
            return response;
        }
        self.choices
            .as_deref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .unwrap_or("")
    }
}

/// A named binary blob handed to the markdown converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl NamedBlob {
    /// HTML page blob as sent by the page fetcher
    pub fn html_page(body: impl Into<Vec<u8>>) -> Self {
        Self {
            name: "page.html".to_string(),
            mime_type: "text/html".to_string(),
            data: body.into(),
        }
    }
}

/// Output of a markdown conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// `markdown` on success, anything else means the converter gave up
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl ConversionResult {
    pub fn markdown(data: impl Into<String>) -> Self {
        Self {
            format: "markdown".to_string(),
            data: Some(data.into()),
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.format == "markdown"
    }
}
