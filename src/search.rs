//! Search orchestration.

use std::sync::Arc;

use futures::future::join;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::instant::InstantAnswerResolver;
use crate::random::Jitter;
use crate::strategies::{HtmlScraper, LiteScraper};
use crate::strategy::{Strategy, StrategyContext, StrategyKind};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::{CombinedResult, InstantAnswer, Result, SearchError, SearchResult};

/// Default result count for [`Search::search_web`] callers.
pub const DEFAULT_WEB_RESULTS: usize = 10;

/// Default result count for [`Search::search_combined`] callers.
pub const DEFAULT_COMBINED_RESULTS: usize = 5;

/// Outcome of a web search, with the strategies that were tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResolution {
    /// Results from the strategy that resolved the query.
    pub results: Vec<SearchResult>,
    /// Strategies attempted, in order.
    pub attempted: Vec<StrategyKind>,
    /// Strategy that produced the results, if any did.
    pub resolved_by: Option<StrategyKind>,
}

/// Public entry point: composes the primary and fallback strategies for web
/// search, and runs instant answers alongside them for combined search.
///
/// Cloning is cheap; clones share the transport and random source.
#[derive(Clone)]
pub struct Search {
    primary: Arc<dyn Strategy>,
    fallback: Arc<dyn Strategy>,
    instant: InstantAnswerResolver,
}

impl Search {
    /// Creates a search backed by reqwest with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ProviderConfig::default())
    }

    /// Creates a search backed by reqwest.
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::with_transport(transport, config, Jitter::from_entropy()))
    }

    /// Creates a search over an arbitrary transport and random source.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        config: ProviderConfig,
        jitter: Jitter,
    ) -> Self {
        let context = StrategyContext::new(transport, config, jitter);
        Self {
            primary: Arc::new(LiteScraper::new(context.clone())),
            fallback: Arc::new(HtmlScraper::new(context.clone())),
            instant: InstantAnswerResolver::new(context),
        }
    }

    /// Creates a search from explicit parts.
    pub fn with_strategies(
        primary: Arc<dyn Strategy>,
        fallback: Arc<dyn Strategy>,
        instant: InstantAnswerResolver,
    ) -> Self {
        Self {
            primary,
            fallback,
            instant,
        }
    }

    /// Runs the primary strategy, then the fallback if the primary found
    /// nothing. Both coming back empty is a valid, empty resolution.
    pub async fn resolve_web(&self, query: &str, max_results: usize) -> Result<WebResolution> {
        validate(query, max_results)?;

        let mut attempted = Vec::with_capacity(2);
        for strategy in [&self.primary, &self.fallback] {
            let kind = strategy.kind();
            attempted.push(kind);
            debug!("Trying {:?} strategy for '{}'", kind, query);

            let mut results = strategy.search(query, max_results).await?;
            if !results.is_empty() {
                results.truncate(max_results);
                debug!("{:?} strategy returned {} results", kind, results.len());
                return Ok(WebResolution {
                    results,
                    attempted,
                    resolved_by: Some(kind),
                });
            }
        }

        debug!("No strategy returned results for '{}'", query);
        Ok(WebResolution {
            results: Vec::new(),
            attempted,
            resolved_by: None,
        })
    }

    /// Web search with primary-then-fallback resolution.
    pub async fn search_web(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        Ok(self.resolve_web(query, max_results).await?.results)
    }

    /// Instant-answer lookup. Absence is a normal outcome.
    pub async fn search_instant_answer(&self, query: &str) -> Option<InstantAnswer> {
        if query.trim().is_empty() {
            return None;
        }
        self.instant.resolve(query).await
    }

    /// Runs the instant-answer lookup and web search concurrently and merges
    /// them. Waits for both; any fault is reported as `status=error`.
    pub async fn search_combined(&self, query: &str, max_results: usize) -> CombinedResult {
        let instant = {
            let search = self.clone();
            let query = query.to_string();
            tokio::spawn(async move { search.search_instant_answer(&query).await })
        };
        let web = {
            let search = self.clone();
            let query = query.to_string();
            tokio::spawn(async move { search.search_web(&query, max_results).await })
        };

        match join(instant, web).await {
            (Ok(answer), Ok(Ok(results))) => CombinedResult::success(query, answer, results),
            (_, Ok(Err(e))) => {
                warn!("Combined search for '{}' failed: {}", query, e);
                CombinedResult::failure(query, e.to_string())
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Combined search task for '{}' aborted: {}", query, e);
                CombinedResult::failure(query, format!("Search task failed: {}", e))
            }
        }
    }
}

fn validate(query: &str, max_results: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
    }
    if max_results == 0 {
        return Err(SearchError::InvalidQuery("max_results must be at least 1".into()));
    }
    Ok(())
}
