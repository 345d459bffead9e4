use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::normalizer::normalize;
use super::synthesizer::{SynthesisContext, database_only, synthesize};
use crate::gemini::GenerativeBackend;
use crate::locale::{Language, StringTable, strings};
use crate::models::{MedicineDetails, NormalizeStatus, NormalizedTerm, StoredRecord};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Normalizing,
    LookingUp,
    Synthesizing,
    Done,
}

/// Non-fatal condition the user should be told about alongside the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    EnhancementUnavailable,
    EnhancementFailed,
    StoreUnavailable,
}

impl Notice {
    pub fn text(self, table: &StringTable) -> &'static str {
        match self {
            Notice::EnhancementUnavailable => table.enhancement_unavailable,
            Notice::EnhancementFailed => table.enhancement_failed,
            Notice::StoreUnavailable => table.store_unavailable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub term: NormalizedTerm,
    pub results: Vec<MedicineDetails>,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub trace: Vec<SearchState>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("search failed: {0}")]
    Store(StoreError),
}

/// Normalize → look up → synthesize, with every stage degrading to a labeled
/// fallback instead of aborting the search.
pub struct Pipeline<B, S> {
    backend: B,
    store: S,
    language: Language,
}

impl<B: GenerativeBackend, S: RecordStore> Pipeline<B, S> {
    pub fn new(backend: B, store: S, language: Language) -> Self {
        Self {
            backend,
            store,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub async fn run(&self, query: &str) -> Result<SearchOutcome, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        info!(query, lang = self.language.code(), "search started");
        let mut trace = vec![SearchState::Idle, SearchState::Normalizing];
        let mut notices = Vec::new();

        let term = normalize(&self.backend, query).await;
        match term.status {
            NormalizeStatus::Unavailable => notices.push(Notice::EnhancementUnavailable),
            NormalizeStatus::Failed => notices.push(Notice::EnhancementFailed),
            NormalizeStatus::Enhanced | NormalizeStatus::OriginalUsed => {}
        }

        trace.push(SearchState::LookingUp);
        let records = match self.store.lookup_by_term(&term.term).await {
            Ok(records) => records,
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "record store unavailable, continuing without records");
                notices.push(Notice::StoreUnavailable);
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "record store lookup failed");
                return Err(PipelineError::Store(e));
            }
        };

        trace.push(SearchState::Synthesizing);
        let results = if records.is_empty() {
            let context = SynthesisContext::Open {
                search_term: term.term.clone(),
            };
            vec![synthesize(&self.backend, &context, self.language).await]
        } else {
            self.enrich_all(records).await
        };

        trace.push(SearchState::Done);
        info!(
            term = %term.term,
            results = results.len(),
            notices = notices.len(),
            "search complete"
        );

        Ok(SearchOutcome {
            query: query.to_string(),
            term,
            results,
            notices,
            trace,
        })
    }

    /// One synthesis per record, awaited jointly. A branch that panics is
    /// replaced by the store-only record; its siblings are unaffected.
    async fn enrich_all(&self, records: Vec<StoredRecord>) -> Vec<MedicineDetails> {
        let contexts: Vec<_> = records
            .iter()
            .cloned()
            .map(SynthesisContext::Record)
            .collect();

        let branches = contexts.iter().map(|context| {
            AssertUnwindSafe(synthesize(&self.backend, context, self.language)).catch_unwind()
        });
        let outcomes = join_all(branches).await;

        let text = strings(self.language);
        records
            .iter()
            .zip(outcomes)
            .map(|(record, outcome)| match outcome {
                Ok(details) => details,
                Err(_) => {
                    warn!(record = %record.id, "detail synthesis panicked, showing stored record only");
                    database_only(record, text)
                }
            })
            .collect()
    }
}
