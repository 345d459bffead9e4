use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use medisearch::cli::{Cli, Command};
use medisearch::format::{format_outcome, format_suggestions};
use medisearch::gemini::GeminiClient;
use medisearch::locale::{Language, strings};
use medisearch::search::suggest::{Suggestions, debounce_suggestions};
use medisearch::search::{Pipeline, PipelineError};
use medisearch::store::{MemoryStore, RecordStore};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medisearch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let store = match &cli.store {
        Some(path) => MemoryStore::from_path(path)
            .inspect_err(|e| error!(path = %path.display(), "failed to load record store: {e}"))?,
        None => MemoryStore::sample(),
    };
    info!(records = store.record_count(), "record store ready");

    match cli.command {
        Command::Search { query, lang, json } => search(store, &query.join(" "), lang, json).await,
        Command::Suggest {
            prefix,
            limit,
            stream,
            debounce_ms,
        } => {
            if stream {
                suggest_stream(&store, limit, Duration::from_millis(debounce_ms)).await?;
            } else {
                let names = store
                    .list_suggestions(prefix.as_deref().unwrap_or_default(), limit)
                    .await?;
                print!("{}", format_suggestions(&names));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn search(
    store: MemoryStore,
    query: &str,
    lang: Language,
    json: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let gemini = GeminiClient::from_env(http)
        .inspect(|g| info!(model = g.model(), "Gemini client configured"))
        .inspect_err(|e| warn!("Gemini client not available: {e}"))
        .ok();

    let pipeline = Pipeline::new(gemini, store, lang);
    let text = strings(pipeline.language());

    match pipeline.run(query).await {
        Ok(outcome) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", format_outcome(&outcome, text));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(PipelineError::EmptyQuery) => {
            info!("empty query ignored");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "search aborted");
            eprintln!("{}", text.generic_error);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn suggest_stream(
    store: &MemoryStore,
    limit: usize,
    delay: Duration,
) -> Result<(), std::io::Error> {
    let (in_tx, in_rx) = mpsc::channel(64);
    let (out_tx, mut out_rx) = mpsc::channel::<Suggestions>(16);

    let read_input = async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if in_tx.send(line).await.is_err() {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    };

    let print_output = async {
        while let Some(suggestions) = out_rx.recv().await {
            println!("[{}]", suggestions.prefix);
            print!("{}", format_suggestions(&suggestions.names));
        }
    };

    let (read, (), ()) = tokio::join!(
        read_input,
        debounce_suggestions(store, in_rx, out_tx, delay, limit),
        print_output,
    );
    read
}
