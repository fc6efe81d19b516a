// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use tracing::Level;

use super::pattern::{DEFAULT_SLUG_REGEX, SlugPattern};

/// Default Workers AI text generation model
pub const DEFAULT_AI_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

/// Default system prompt; `{slugRegex}` is replaced with the slug pattern
pub const DEFAULT_AI_PROMPT: &str = "You are a URL shortening assistant, please shorten the URL provided by the user into a SLUG. The SLUG information must come from the URL itself, do not make any assumptions. A SLUG is human-readable and should not exceed three words and can be validated using regular expressions {slugRegex} . Only the best one is returned, the format must be JSON reference {\"slug\": \"example-slug\"}";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Cloudflare credentials (CLOUDFLARE_ACCOUNT_ID / CLOUDFLARE_API_TOKEN)
#[derive(Debug, Clone, Default)]
pub struct AiCredentials {
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    /// API root override (LINKSLUG_AI_BASE_URL)
    pub base_url: Option<String>,
}

impl AiCredentials {
    /// Load credentials from environment variables
    ///
    /// Set `LINKSLUG_DISABLE_AI=1` to suppress all credentials (route answers 501)
    pub fn from_env() -> Self {
        if parse_bool_env("LINKSLUG_DISABLE_AI").unwrap_or(false) {
            return Self::default();
        }

        Self {
            account_id: read_var("CLOUDFLARE_ACCOUNT_ID"),
            api_token: read_var("CLOUDFLARE_API_TOKEN"),
            base_url: read_var("LINKSLUG_AI_BASE_URL"),
        }
    }

    /// AI is usable once a token and either an account or a base URL are known
    pub fn is_enabled(&self) -> bool {
        self.api_token.is_some() && (self.account_id.is_some() || self.base_url.is_some())
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Model identifier (LINKSLUG_AI_MODEL)
    pub ai_model: String,
    /// System prompt template (LINKSLUG_AI_PROMPT)
    pub ai_prompt: String,
    /// Slug pattern literal (LINKSLUG_SLUG_REGEX), parsed by `validate`/`slug_pattern`
    pub slug_regex: String,
    pub credentials: AiCredentials,
    /// Bearer token guarding the HTTP route (LINKSLUG_SITE_TOKEN)
    pub site_token: Option<String>,
    pub host: String,
    pub port: u16,
    /// Log level override (LINKSLUG_LOG_LEVEL)
    pub log_level: Option<Level>,
    /// Problems found while reading the environment, reported by `validate`
    pub load_warnings: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_prompt: DEFAULT_AI_PROMPT.to_string(),
            slug_regex: DEFAULT_SLUG_REGEX.to_string(),
            credentials: AiCredentials::default(),
            site_token: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: None,
            load_warnings: Vec::new(),
        }
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    ///
    /// Runs before logging is set up, so problems are collected into
    /// `load_warnings` instead of being logged.
    pub fn load() -> Self {
        let mut load_warnings = Vec::new();

        let port = match read_var("LINKSLUG_PORT").map(|raw| parse_port(&raw)) {
            Some(Ok(port)) => port,
            Some(Err(msg)) => {
                load_warnings.push(msg);
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };

        let log_level = match read_var("LINKSLUG_LOG_LEVEL").map(|raw| parse_log_level(&raw)) {
            Some(Ok(level)) => Some(level),
            Some(Err(msg)) => {
                load_warnings.push(msg);
                None
            }
            None => None,
        };

        Self {
            ai_model: read_var("LINKSLUG_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_prompt: read_var("LINKSLUG_AI_PROMPT")
                .unwrap_or_else(|| DEFAULT_AI_PROMPT.to_string()),
            slug_regex: read_var("LINKSLUG_SLUG_REGEX")
                .unwrap_or_else(|| DEFAULT_SLUG_REGEX.to_string()),
            credentials: AiCredentials::from_env(),
            site_token: read_var("LINKSLUG_SITE_TOKEN"),
            host: read_var("LINKSLUG_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_level,
            load_warnings,
        }
    }

    /// Parse the configured slug pattern
    pub fn slug_pattern(&self) -> crate::Result<SlugPattern> {
        self.slug_regex.parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        for msg in &self.load_warnings {
            validation.add_warning(msg.clone());
        }

        match self.slug_pattern() {
            Err(e) => validation.add_error(format!("LINKSLUG_SLUG_REGEX: {}", e)),
            Ok(pattern) => {
                if let Some(reason) = pattern.compile_error() {
                    validation.add_warning(format!(
                        "LINKSLUG_SLUG_REGEX cannot be evaluated locally, it is passed to the model as-is: {}",
                        reason
                    ));
                }
            }
        }

        if !self.ai_prompt.contains("{slugRegex}") {
            validation.add_warning(
                "LINKSLUG_AI_PROMPT has no {slugRegex} placeholder; the model will not see the slug format",
            );
        }

        if self.ai_model.trim().is_empty() {
            validation.add_error("LINKSLUG_AI_MODEL is empty");
        }

        if !self.credentials.is_enabled() {
            validation.add_warning(
                "No Workers AI credentials configured. Set CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN.",
            );
        }

        if self.site_token.is_none() {
            validation.add_warning("LINKSLUG_SITE_TOKEN is not set; the API is unauthenticated");
        }

        validation
    }
}

/// Read a single variable, filtering empty values
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_port(raw: &str) -> Result<u16, String> {
    raw.trim().parse().map_err(|_| {
        format!(
            "Invalid LINKSLUG_PORT '{}', using default {}",
            raw, DEFAULT_PORT
        )
    })
}

fn parse_log_level(raw: &str) -> Result<Level, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Unknown LINKSLUG_LOG_LEVEL '{}', ignoring", raw))
}

fn parse_bool_env(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?.to_lowercase();
    match value.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
