// src/config/pattern.rs
// Slug validation pattern written as a `/source/flags` regex literal

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;

use crate::error::SlugError;

const DEFAULT_SOURCE: &str = "^[a-z0-9]+(?:-[a-z0-9]+)*$";
const DEFAULT_FLAGS: &str = "i";

/// Default slug pattern: lowercase words joined by single hyphens
pub const DEFAULT_SLUG_REGEX: &str = "/^[a-z0-9]+(?:-[a-z0-9]+)*$/i";

/// Flags a regex literal may carry
const KNOWN_FLAGS: &str = "dgimsuvy";

/// A slug pattern kept in its literal form.
///
/// The literal is what the model is shown in the system prompt, so `Display`
/// reproduces it exactly as configured. Local matching compiles the source on
/// first use; literals using syntax the `regex` crate lacks (look-around,
/// backreferences) are still valid patterns, they just cannot be evaluated
/// here.
#[derive(Debug, Clone)]
pub struct SlugPattern {
    source: String,
    flags: String,
    compiled: OnceCell<Result<Regex, String>>,
}

impl SlugPattern {
    /// Fails only on flags no regex literal accepts
    pub fn new(source: &str, flags: &str) -> Result<Self, SlugError> {
        if let Some(bad) = flags.chars().find(|c| !KNOWN_FLAGS.contains(*c)) {
            return Err(SlugError::Config(format!(
                "unsupported slug regex flag '{}'",
                bad
            )));
        }

        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            compiled: OnceCell::new(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Why the pattern cannot be evaluated locally, if it cannot
    pub fn compile_error(&self) -> Option<&str> {
        self.compiled().as_ref().err().map(String::as_str)
    }

    /// Check a candidate slug against the pattern. `None` when the pattern
    /// cannot be evaluated locally.
    pub fn is_match(&self, slug: &str) -> Option<bool> {
        self.compiled()
            .as_ref()
            .ok()
            .map(|regex| regex.is_match(slug))
    }

    fn compiled(&self) -> &Result<Regex, String> {
        self.compiled.get_or_init(|| {
            let mut builder = RegexBuilder::new(&self.source);
            for flag in self.flags.chars() {
                match flag {
                    'i' => builder.case_insensitive(true),
                    'm' => builder.multi_line(true),
                    's' => builder.dot_matches_new_line(true),
                    'u' | 'v' => builder.unicode(true),
                    // Stateful flags have no meaning for a single match
                    _ => &mut builder,
                };
            }
            builder.build().map_err(|e| e.to_string())
        })
    }
}

impl Default for SlugPattern {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            flags: DEFAULT_FLAGS.to_string(),
            compiled: OnceCell::new(),
        }
    }
}

impl FromStr for SlugPattern {
    type Err = SlugError;

    /// Accepts `/source/flags` or a bare source with no flags
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() >= 2 && s.starts_with('/') {
            if let Some(end) = s.rfind('/').filter(|&end| end > 0) {
                return Self::new(&s[1..end], &s[end + 1..]);
            }
        }
        Self::new(s, "")
    }
}

impl fmt::Display for SlugPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
