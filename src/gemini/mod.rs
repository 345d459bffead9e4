//! Gemini structured-output client used for query normalization and detail synthesis.

pub mod client;
mod output;
pub mod prompts;
pub mod types;

pub use client::{GeminiClient, GeminiError, GenerativeBackend};
