//! ddg-search CLI - DuckDuckGo web search, instant answers and combined search.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use ddg_search::{
    CombinedResult, InstantAnswer, Jitter, ProviderConfig, ReqwestTransport, Search,
    SearchResult, DEFAULT_COMBINED_RESULTS, DEFAULT_WEB_RESULTS,
};

/// ddg-search - DuckDuckGo search without an API key
#[derive(Parser)]
#[command(name = "ddg-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Provider configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(short, long, global = true)]
    proxy: Option<String>,

    /// Seed for identity rotation and pacing jitter
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Web search (lite endpoint, falling back to the full endpoint)
    Web {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_WEB_RESULTS)]
        max_results: usize,
    },

    /// Instant answer lookup (computations, definitions, summaries)
    Answer {
        /// Question or keywords
        query: String,
    },

    /// Instant answer and web search run concurrently
    Combined {
        /// Search query
        query: String,

        /// Maximum number of web results
        #[arg(short = 'n', long, default_value_t = DEFAULT_COMBINED_RESULTS)]
        max_results: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// JSON envelope
    Json,
    /// Human-readable text output
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let search = build_search(&cli)?;

    let output = match &cli.command {
        Commands::Web { query, max_results } => {
            let outcome = search.search_web(query, *max_results).await;
            match cli.format {
                OutputFormat::Json => web_envelope(query, outcome),
                OutputFormat::Text => {
                    print_results(&outcome?);
                    return Ok(());
                }
            }
        }
        Commands::Answer { query } => {
            let answer = search.search_instant_answer(query).await;
            match cli.format {
                OutputFormat::Json => answer_envelope(query, answer.as_ref()),
                OutputFormat::Text => {
                    print_answer(answer.as_ref());
                    return Ok(());
                }
            }
        }
        Commands::Combined { query, max_results } => {
            let combined = search.search_combined(query, *max_results).await;
            match cli.format {
                OutputFormat::Json => combined_envelope(&combined),
                OutputFormat::Text => {
                    if let Some(error) = &combined.error {
                        anyhow::bail!("{}", error);
                    }
                    print_answer(combined.instant_answer.as_ref());
                    println!();
                    print_results(&combined.web_results);
                    return Ok(());
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_search(cli: &Cli) -> Result<Search> {
    let config = match &cli.config {
        Some(path) => ProviderConfig::from_json_file(path)?,
        None => ProviderConfig::default(),
    };

    let transport = match &cli.proxy {
        Some(proxy_url) => {
            let scheme = url::Url::parse(proxy_url)?.scheme().to_string();
            if !matches!(scheme.as_str(), "http" | "https" | "socks5") {
                anyhow::bail!("Unsupported proxy protocol: {}", scheme);
            }
            ReqwestTransport::with_proxy(proxy_url)?
        }
        None => ReqwestTransport::new()?,
    };

    let jitter = cli.seed.map(Jitter::seeded).unwrap_or_else(Jitter::from_entropy);
    Ok(Search::with_transport(Arc::new(transport), config, jitter))
}

fn web_envelope(query: &str, outcome: ddg_search::Result<Vec<SearchResult>>) -> Value {
    match outcome {
        Ok(results) if results.is_empty() => json!({
            "status": "success",
            "query": query,
            "results_count": 0,
            "results": [],
            "message": "No search results found.",
        }),
        Ok(results) => json!({
            "status": "success",
            "query": query,
            "results_count": results.len(),
            "results": results,
        }),
        Err(e) => error_envelope(query, &e.to_string(), "An error occurred during the search."),
    }
}

fn answer_envelope(query: &str, answer: Option<&InstantAnswer>) -> Value {
    match answer {
        Some(answer) => json!({
            "status": "success",
            "query": query,
            "has_answer": true,
            "answer": answer,
        }),
        None => json!({
            "status": "success",
            "query": query,
            "has_answer": false,
            "message": "No instant answer found.",
        }),
    }
}

fn combined_envelope(combined: &CombinedResult) -> Value {
    match &combined.error {
        Some(error) => error_envelope(
            &combined.query,
            error,
            "An error occurred during the combined search.",
        ),
        None => json!({
            "status": "success",
            "query": combined.query,
            "instant_answer": combined.instant_answer,
            "web_results": {
                "count": combined.web_results.len(),
                "results": combined.web_results,
            },
        }),
    }
}

fn error_envelope(query: &str, error: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "query": query,
        "error": error,
        "message": message,
    })
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No search results found.");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}", i + 1, result.title);
        println!("   URL: {}", result.url);
        println!("   {}", result.description);
        println!();
    }
}

fn print_answer(answer: Option<&InstantAnswer>) {
    match answer {
        Some(answer) => {
            println!("Answer: {}", answer.answer);
            if !answer.source.is_empty() {
                println!("Source: {}", answer.source);
            }
            if !answer.url.is_empty() {
                println!("URL: {}", answer.url);
            }
        }
        None => println!("No instant answer found."),
    }
}
