//! Medicine lookup: normalize a user query with Gemini, look it up in the
//! record store, and complete the matched records with AI-written details.

pub mod cli;
pub mod format;
pub mod gemini;
pub mod locale;
mod markdown;
pub mod models;
pub mod search;
pub mod store;

pub const USER_AGENT: &str = concat!("medisearch/", env!("CARGO_PKG_VERSION"));
