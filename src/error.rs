// src/error.rs
// Standardized error types for linkslug

use thiserror::Error;

/// Main error type for the linkslug library
#[derive(Error, Debug)]
pub enum SlugError {
    /// No completion capability is configured. Callers branch on this to
    /// tell "feature disabled" apart from a bad result.
    #[error("AI not enabled")]
    CapabilityUnavailable,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using SlugError
pub type Result<T> = std::result::Result<T, SlugError>;

impl SlugError {
    /// Whether this error means the AI feature is switched off rather than broken
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, SlugError::CapabilityUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_unavailable_message() {
        let err = SlugError::CapabilityUnavailable;
        assert_eq!(err.to_string(), "AI not enabled");
        assert!(err.is_capability_unavailable());
    }

    #[test]
    fn test_invalid_input_error() {
        let err = SlugError::InvalidInput("bad url".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("bad url"));
        assert!(!err.is_capability_unavailable());
    }

    #[test]
    fn test_llm_error() {
        let err = SlugError::Llm("rate limited".to_string());
        assert!(err.to_string().contains("LLM error"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: SlugError = json_err.into();
        assert!(matches!(err, SlugError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
