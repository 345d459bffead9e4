use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::locale::Language;
use crate::store::DEFAULT_SUGGESTION_LIMIT;

/// Medicine lookup with AI-completed details.
///
/// Configuration via environment variables:
/// - `GEMINI_API_KEY`: enables query normalization and detail synthesis (optional)
/// - `GEMINI_MODEL`: model name (default: gemini-2.5-flash)
/// - `RUST_LOG`: log filter, logs go to stderr (default: medisearch=info)
#[derive(Debug, Parser)]
#[command(name = "medisearch", version, about)]
pub struct Cli {
    /// JSON file with an array of stored records (default: built-in sample dataset)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for a medicine by name, barcode, or composition
    Search {
        /// Search query; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Language for details and fallback text
        #[arg(long, value_enum, default_value_t = Language::En)]
        lang: Language,
        /// Print results as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// List stored medicine names for search-box suggestions
    Suggest {
        /// Name prefix; omit with --stream
        prefix: Option<String>,
        /// Maximum number of suggestions
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
        /// Read successive search-box contents from stdin, one per line, and
        /// print suggestions after each pause in input
        #[arg(long, conflicts_with = "prefix")]
        stream: bool,
        /// Inactivity delay in milliseconds before a streamed lookup (minimum 300)
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
}
