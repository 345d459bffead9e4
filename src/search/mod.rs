//! Search orchestration: query normalization, store lookup, detail synthesis,
//! and debounced suggestions.

pub mod normalizer;
pub mod pipeline;
pub mod suggest;
pub mod synthesizer;

pub use pipeline::{Notice, Pipeline, PipelineError, SearchOutcome, SearchState};

use crate::gemini::GeminiError;

/// How a failed model call is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiFailure {
    /// Credentials, permissions, billing, or model selection prevent any call from succeeding.
    Unavailable,
    /// This call failed: quota, transport, server error, or unusable output.
    Failed,
}

impl From<&GeminiError> for AiFailure {
    fn from(e: &GeminiError) -> Self {
        if e.is_configuration() {
            AiFailure::Unavailable
        } else {
            AiFailure::Failed
        }
    }
}
