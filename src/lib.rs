// src/lib.rs
// linkslug - AI-assisted slug generation for short links

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod markdown;
pub mod slug;
pub mod utils;
pub mod web;

pub use error::{Result, SlugError};
