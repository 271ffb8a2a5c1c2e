//! Fallback strategy: GET against the full search endpoint.
//!
//! The full page has changed layout several times, so result containers are
//! located by trying [`RESULT_PATTERNS`] in order. The first pattern that
//! matches anything is used exclusively.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::RequestClass;
use crate::strategy::{
    element_text, parse_selector, resolve_href, Strategy, StrategyContext, StrategyKind,
};
use crate::transport::HttpRequest;
use crate::{Result, SearchResult};

/// Result container selectors, most recent layout first.
pub const RESULT_PATTERNS: &[&str] = &[
    r#"article[data-testid="result"]"#,
    r#"div[data-testid="result"]"#,
    ".result",
    ".web-result",
    "div.result__body",
    r#"li[data-layout="organic"]"#,
];

/// Title link selectors tried inside a container.
pub const TITLE_SELECTORS: &[&str] = &[
    "h3 a",
    "h2 a",
    ".result__title a",
    r#"a[data-testid="result-title-a"]"#,
];

/// Snippet selectors tried inside a container.
pub const SNIPPET_SELECTORS: &[&str] = &[
    ".result__snippet",
    r#"[data-testid="result-snippet"]"#,
    ".snippet",
];

/// Scrapes the full search endpoint.
#[derive(Clone)]
pub struct HtmlScraper {
    context: StrategyContext,
}

impl HtmlScraper {
    /// Creates a fallback scraper over the shared strategy context.
    pub fn new(context: StrategyContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Strategy for HtmlScraper {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let request = HttpRequest::get(&self.context.config().html_url)
            .query("q", query)
            .query("ia", "web");

        let Some(response) = self.context.send(RequestClass::Fallback, request).await else {
            return Ok(Vec::new());
        };

        let results = parse_results(&response.body, max_results)?;
        debug!("HTML endpoint yielded {} results for '{}'", results.len(), query);
        Ok(results)
    }
}

fn compile(list: &[&str]) -> Result<Vec<Selector>> {
    list.iter().map(|css| parse_selector(css)).collect()
}

/// Returns the index of the first pattern matching at least one element,
/// together with the matched containers.
pub fn select_containers<'a>(
    document: &'a Html,
    patterns: &[Selector],
) -> Option<(usize, Vec<ElementRef<'a>>)> {
    patterns.iter().enumerate().find_map(|(index, pattern)| {
        let elements: Vec<_> = document.select(pattern).collect();
        (!elements.is_empty()).then_some((index, elements))
    })
}

/// Parses the full result page, keeping at most `max_results` results.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);
    let patterns = compile(RESULT_PATTERNS)?;
    let titles = compile(TITLE_SELECTORS)?;
    let snippets = compile(SNIPPET_SELECTORS)?;

    let Some((index, containers)) = select_containers(&document, &patterns) else {
        debug!("No result pattern matched");
        return Ok(Vec::new());
    };
    debug!(
        "Result pattern '{}' matched {} containers",
        RESULT_PATTERNS[index],
        containers.len()
    );

    let results = containers
        .into_iter()
        .filter_map(|container| parse_container(container, &titles, &snippets))
        .take(max_results)
        .collect();

    Ok(results)
}

fn first_match<'a>(container: ElementRef<'a>, candidates: &[Selector]) -> Option<ElementRef<'a>> {
    candidates
        .iter()
        .find_map(|selector| container.select(selector).next())
}

fn parse_container(
    container: ElementRef<'_>,
    titles: &[Selector],
    snippets: &[Selector],
) -> Option<SearchResult> {
    let link = first_match(container, titles)?;
    let url = resolve_href(link.value().attr("href")?)?;

    let title = element_text(&link);
    if title.is_empty() {
        return None;
    }

    let description = first_match(container, snippets)
        .map(|snippet| element_text(&snippet))
        .unwrap_or_default();

    Some(SearchResult::new(title, url, description))
}
