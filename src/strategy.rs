//! Strategy trait and the request plumbing shared by all strategies.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ProviderConfig, RequestClass};
use crate::identity::IdentityProvider;
use crate::pacing::Pacer;
use crate::random::Jitter;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Result, SearchError, SearchResult};

/// Identifies a web-result strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Lite endpoint, tabular layout.
    Primary,
    /// Full endpoint, selector heuristics.
    Fallback,
}

/// One self-contained way of obtaining web results.
///
/// An empty vector is the expected degraded outcome (blocked, non-200,
/// timeout, nothing parsed). `Err` is reserved for unexpected faults.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Transport, identity, pacing and configuration shared by the strategies
/// of one provider.
#[derive(Clone)]
pub struct StrategyContext {
    transport: Arc<dyn HttpTransport>,
    identity: IdentityProvider,
    pacer: Pacer,
    config: ProviderConfig,
}

impl StrategyContext {
    /// Creates a context whose identity and pacing share `jitter`.
    pub fn new(transport: Arc<dyn HttpTransport>, config: ProviderConfig, jitter: Jitter) -> Self {
        Self {
            transport,
            identity: IdentityProvider::new(jitter.clone(), config.accept_language.clone()),
            pacer: Pacer::new(jitter, config.clone()),
            config,
        }
    }

    /// Provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Paces, attaches a fresh identity and the class timeout, and sends.
    ///
    /// Returns `None` on non-200, timeout or transport fault.
    pub async fn send(&self, class: RequestClass, request: HttpRequest) -> Option<HttpResponse> {
        self.pacer.before_request(class).await;

        let timeout = self.config.class(class).timeout();
        let request = request
            .headers(self.identity.next_headers())
            .timeout(timeout);
        let url = request.url.clone();

        match tokio::time::timeout(timeout, self.transport.execute(request)).await {
            Ok(Ok(response)) if response.is_ok() => {
                debug!("{:?} request to {} returned {} bytes", class, url, response.body.len());
                Some(response)
            }
            Ok(Ok(response)) => {
                warn!("{:?} request to {} returned HTTP {}", class, url, response.status);
                None
            }
            Ok(Err(e)) => {
                warn!("{:?} request to {} failed: {}", class, url, e);
                None
            }
            Err(_) => {
                warn!("{:?} request to {} timed out after {:?}", class, url, timeout);
                None
            }
        }
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector '{}': {:?}", css, e)))
}

/// Element text with whitespace runs collapsed and ends trimmed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a result href to an absolute target.
///
/// Redirect links are unwrapped, protocol-relative links get `https:`, and
/// same-site links (starting with `/`) are rejected as navigation.
pub(crate) fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if href.contains("duckduckgo.com/l/?") {
        if let Some(target) = extract_redirect_url(href) {
            return Some(target);
        }
    }

    if let Some(rest) = href.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    if href.starts_with('/') {
        return None;
    }

    Some(href.to_string())
}

fn extract_redirect_url(href: &str) -> Option<String> {
    let start = href.find("uddg=")? + "uddg=".len();
    let encoded = &href[start..];
    let end = encoded.find('&').unwrap_or(encoded.len());
    let decoded = urlencoding::decode(&encoded[..end]).ok()?;
    if decoded.is_empty() || decoded.starts_with('/') {
        return None;
    }
    Some(decoded.into_owned())
}
