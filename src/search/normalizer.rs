//! Turns a raw user query into the term the record store is searched with.

use tracing::{debug, warn};

use super::AiFailure;
use crate::gemini::types::{NormalizeInput, NormalizeOutput, NormalizeTag};
use crate::gemini::{GeminiError, GenerativeBackend};
use crate::models::{NormalizeStatus, NormalizedTerm};

/// Asks the model for the canonical medicine identifier behind `query`.
///
/// `query` must already be trimmed and non-empty. Never fails: every error
/// degrades to the original query with a status explaining why.
pub async fn normalize(backend: &impl GenerativeBackend, query: &str) -> NormalizedTerm {
    let input = NormalizeInput {
        query: query.to_string(),
    };
    let term = decide(query, backend.normalize(&input).await);
    debug!(query, term = %term.term, status = ?term.status, "query normalized");
    term
}

/// Decision table from a model outcome to the normalized term.
pub fn decide(query: &str, outcome: Result<NormalizeOutput, GeminiError>) -> NormalizedTerm {
    let output = match outcome {
        Ok(output) => output,
        Err(GeminiError::MalformedOutput(reason)) => {
            warn!(%reason, "unusable normalization output, using original query");
            return NormalizedTerm::original(query, NormalizeStatus::OriginalUsed);
        }
        Err(e) => {
            warn!(error = %e, "query normalization failed");
            let status = match AiFailure::from(&e) {
                AiFailure::Unavailable => NormalizeStatus::Unavailable,
                AiFailure::Failed => NormalizeStatus::Failed,
            };
            return NormalizedTerm::original(query, status);
        }
    };

    let corrected = output
        .corrected_medicine_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match (corrected, output.source) {
        (Some(name), Some(NormalizeTag::AiEnhanced) | None) => NormalizedTerm {
            term: name.to_string(),
            status: NormalizeStatus::Enhanced,
        },
        (Some(_), Some(NormalizeTag::Other(tag))) => {
            warn!(tag = %tag, "unexpected normalization source tag, using original query");
            NormalizedTerm::original(query, NormalizeStatus::OriginalUsed)
        }
        (Some(_), Some(NormalizeTag::OriginalQuery)) | (None, _) => {
            NormalizedTerm::original(query, NormalizeStatus::OriginalUsed)
        }
    }
}
