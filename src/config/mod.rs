// src/config/mod.rs
// Runtime configuration

pub mod env;
pub mod pattern;

pub use env::{AiCredentials, ConfigValidation, EnvConfig};
pub use pattern::SlugPattern;
