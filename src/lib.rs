//! # ddg-search
//!
//! A DuckDuckGo search client that scrapes result pages without relying on a
//! documented API.
//!
//! - Primary strategy: form POST to the lite endpoint, tabular layout
//! - Fallback strategy: GET to the full endpoint, ordered selector heuristics
//! - Instant answers from the JSON endpoint
//! - Combined mode running instant answers and web search concurrently
//! - Rotating browser identities and randomized request pacing
//!
//! ## Example
//!
//! ```rust,no_run
//! use ddg_search::Search;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let search = Search::new()?;
//!
//!     for result in search.search_web("rust programming", 10).await? {
//!         println!("{}: {}", result.title, result.url);
//!     }
//!
//!     let combined = search.search_combined("2+2", 5).await;
//!     if let Some(answer) = combined.instant_answer {
//!         println!("Answer: {}", answer.answer);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod result;
mod search;

pub mod config;
pub mod identity;
pub mod instant;
pub mod pacing;
pub mod random;
pub mod strategies;
pub mod strategy;
pub mod transport;

pub use config::{DelayWindow, ProviderConfig, RequestClass, StrategyConfig};
pub use error::{Result, SearchError};
pub use instant::InstantAnswerResolver;
pub use random::Jitter;
pub use result::{
    AnswerKind, CombinedResult, InstantAnswer, SearchResult, SearchStatus, NO_DESCRIPTION,
};
pub use search::{Search, WebResolution, DEFAULT_COMBINED_RESULTS, DEFAULT_WEB_RESULTS};
pub use strategy::{Strategy, StrategyContext, StrategyKind};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
