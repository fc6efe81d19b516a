// src/web/state.rs
// Web server state management

use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::config::EnvConfig;
use crate::error::Result;
use crate::llm::{CompletionCapability, MarkdownConverter, WorkersAiClient};
use crate::slug::SlugSettings;

/// Shared application state (immutable after startup)
#[derive(Clone)]
pub struct AppState {
    /// HTTP client for page fetches
    pub client: Client,

    /// Completion backend; `None` means AI is disabled
    pub completion: Option<Arc<dyn CompletionCapability>>,

    /// HTML to markdown backend
    pub converter: Option<Arc<dyn MarkdownConverter>>,

    pub settings: Arc<SlugSettings>,

    /// Bearer token required on API routes, if any
    pub site_token: Option<Arc<str>>,
}

impl AppState {
    /// State with no AI backends configured
    pub fn new(client: Client, settings: SlugSettings) -> Self {
        Self {
            client,
            completion: None,
            converter: None,
            settings: Arc::new(settings),
            site_token: None,
        }
    }

    /// Use one Workers AI client for both completion and conversion
    pub fn with_workers_ai(mut self, ai: Arc<WorkersAiClient>) -> Self {
        self.completion = Some(ai.clone());
        self.converter = Some(ai);
        self
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionCapability>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_site_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.site_token = Some(token.into());
        self
    }

    /// Build state from environment configuration
    pub fn from_config(config: &EnvConfig, client: Client) -> Result<Self> {
        let mut state = Self::new(client.clone(), SlugSettings::from_config(config)?);

        let creds = &config.credentials;
        let ai = match (creds.api_token.clone(), &creds.base_url, &creds.account_id) {
            (Some(token), Some(base), _) => {
                Some(WorkersAiClient::with_base_url(client, base.clone(), token))
            }
            (Some(token), None, Some(account)) => Some(WorkersAiClient::new(client, account, token)),
            _ => None,
        };

        match ai {
            Some(ai) => {
                info!(base_url = %ai.base_url(), model = %config.ai_model, "Workers AI enabled");
                state = state.with_workers_ai(Arc::new(ai));
            }
            None => info!("Workers AI not configured - slug generation disabled"),
        }

        if let Some(token) = &config.site_token {
            state = state.with_site_token(token.as_str());
        }

        Ok(state)
    }

    pub fn ai_enabled(&self) -> bool {
        self.completion.is_some()
    }
}
