//! Debounced search-box suggestions.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::store::RecordStore;

/// Minimum input inactivity before a suggestion lookup is issued.
pub const MIN_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub prefix: String,
    pub names: Vec<String>,
}

/// Consumes successive search-box contents from `input` and emits one
/// suggestion list per quiet period of at least `delay`, always for the latest
/// prefix. A pending prefix is flushed when `input` closes; the loop also
/// stops once `output` has no receiver.
pub async fn debounce_suggestions(
    store: &impl RecordStore,
    mut input: mpsc::Receiver<String>,
    output: mpsc::Sender<Suggestions>,
    delay: Duration,
    limit: usize,
) {
    let delay = delay.max(MIN_DEBOUNCE);
    let mut pending: Option<String> = None;

    loop {
        let next = match pending {
            None => input.recv().await,
            Some(_) => match tokio::time::timeout(delay, input.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    if let Some(prefix) = pending.take()
                        && !emit(store, prefix, &output, limit).await
                    {
                        return;
                    }
                    continue;
                }
            },
        };

        match next {
            Some(prefix) => pending = Some(prefix),
            None => {
                if let Some(prefix) = pending.take() {
                    emit(store, prefix, &output, limit).await;
                }
                return;
            }
        }
    }
}

/// Looks up and sends suggestions; returns false once the receiver is gone.
async fn emit(
    store: &impl RecordStore,
    prefix: String,
    output: &mpsc::Sender<Suggestions>,
    limit: usize,
) -> bool {
    let names = match store.list_suggestions(&prefix, limit).await {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, prefix = %prefix, "suggestion lookup failed");
            Vec::new()
        }
    };
    debug!(prefix = %prefix, count = names.len(), "suggestions ready");
    output.send(Suggestions { prefix, names }).await.is_ok()
}
