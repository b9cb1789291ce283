// Memory Bridge - command-line driver
//
// One-shot: `memory-bridge --query "green tea"` prints the hits as JSON.
// Interactive: each stdin line is treated as typed text; `/search <text>`
// waits for an explicit result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use memory_bridge::{
    ConfigService, FetchError, MemoryApiClient, MemoryHit, QueryObserver, SearchBridge,
    SuccessMeta,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "memory-bridge",
    version,
    about = "Debounced, cached memory search from the terminal"
)]
struct Cli {
    /// Path to the config file (defaults to ~/.memory-bridge/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single explicit search and print the result as JSON
    #[arg(long)]
    query: Option<String>,

    /// Override the explicit search timeout
    #[arg(long)]
    timeout_ms: Option<u64>,
}

/// Prints typing-path results as they arrive.
struct ConsoleObserver;

impl QueryObserver for ConsoleObserver {
    fn on_start(&self, query: &str) {
        println!("… searching '{}'", query);
    }

    fn on_success(&self, query: &str, items: &[MemoryHit], meta: SuccessMeta) {
        let source = if meta.from_cache { "cache" } else { "api" };
        println!("'{}': {} result(s) from {}", query, items.len(), source);
        for item in items {
            match item.score {
                Some(score) => println!("  [{:.2}] {}", score, item.memory),
                None => println!("  {}", item.memory),
            }
        }
    }

    fn on_error(&self, query: &str, error: &FetchError) {
        println!("'{}' failed: {}", query, error);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("memory_bridge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::open_at(path.clone()),
        None => ConfigService::new(),
    }
    .context("Failed to load configuration")?;
    let config = config_service.get_config_clone();

    let client = MemoryApiClient::new(&config.api).context("Failed to create API client")?;
    tracing::info!(url = %client.search_url(), "Memory search client ready");

    let mut builder = SearchBridge::builder(Arc::new(client)).config(&config);
    if cli.query.is_none() {
        builder = builder.observer(Arc::new(ConsoleObserver));
    }
    let bridge = builder.build()?;
    let timeout = cli.timeout_ms.map(Duration::from_millis);

    match cli.query {
        Some(query) => {
            let items = bridge.search_and_wait(&query, timeout).await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
            Ok(())
        }
        None => run_interactive(&bridge, timeout).await,
    }
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Type(&'a str),
    Search(&'a str),
    State,
    Clear,
    Cancel,
    Quit,
    Usage(&'static str),
}

const SEARCH_USAGE: &str = "usage: /search <text>";

fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim_end();
    match line {
        "/quit" => Command::Quit,
        "/state" => Command::State,
        "/clear" => Command::Clear,
        "/cancel" => Command::Cancel,
        "/search" => Command::Usage(SEARCH_USAGE),
        _ => match line.strip_prefix("/search ") {
            Some(text) if text.trim().is_empty() => Command::Usage(SEARCH_USAGE),
            Some(text) => Command::Search(text),
            None => Command::Type(line),
        },
    }
}

async fn run_interactive(bridge: &SearchBridge, timeout: Option<Duration>) -> Result<()> {
    eprintln!("Type to search. Commands: /search <text>, /state, /clear, /cancel, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Command::Quit => break,
            Command::State => println!("{}", serde_json::to_string_pretty(&bridge.get_state())?),
            Command::Clear => bridge.clear_cache(),
            Command::Cancel => bridge.cancel(),
            Command::Usage(usage) => eprintln!("{}", usage),
            Command::Search(text) => match bridge.search_and_wait(text, timeout).await {
                Ok(items) => println!("{}", serde_json::to_string_pretty(&items)?),
                Err(e) => eprintln!("{}", e),
            },
            Command::Type(text) => bridge.set_text(text),
        }
    }

    bridge.cancel();
    Ok(())
}
