//! Primary strategy: form POST against the lite endpoint.
//!
//! The lite page lays results out as table rows. A result row carries the
//! link; its snippet sits either in another cell of the same row or in the
//! following link-free row.

use async_trait::async_trait;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::RequestClass;
use crate::strategy::{
    element_text, parse_selector, resolve_href, Strategy, StrategyContext, StrategyKind,
};
use crate::transport::HttpRequest;
use crate::{Result, SearchError, SearchResult};

/// Scrapes the lite endpoint.
#[derive(Clone)]
pub struct LiteScraper {
    context: StrategyContext,
}

impl LiteScraper {
    /// Creates a lite scraper over the shared strategy context.
    pub fn new(context: StrategyContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Strategy for LiteScraper {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Primary
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let config = self.context.config();
        let request = HttpRequest::post(&config.lite_url)
            .form("q", query)
            .form("kl", &config.region);

        let Some(response) = self.context.send(RequestClass::Primary, request).await else {
            return Ok(Vec::new());
        };

        let results = parse_results(&response.body, max_results)?;
        debug!("Lite endpoint yielded {} results for '{}'", results.len(), query);
        Ok(results)
    }
}

struct RowSelectors {
    row: Selector,
    link: Selector,
    cell: Selector,
}

/// Parses the lite result table, keeping at most `max_results` rows.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(&normalize_rows(html)?);
    let selectors = RowSelectors {
        row: parse_selector("tr")?,
        link: parse_selector("a[href]")?,
        cell: parse_selector("td")?,
    };

    let mut results = Vec::new();
    for row in document.select(&selectors.row) {
        if results.len() >= max_results {
            break;
        }
        if let Some(result) = parse_row(row, &selectors) {
            results.push(result);
        }
    }

    Ok(results)
}

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| SearchError::Parse(format!("Failed to parse pattern '{}': {}", pattern, e)))
}

/// Rewrites row markup so the HTML5 tree builder keeps it.
///
/// A row without cells gets its content wrapped in a `<td>` (otherwise
/// links directly inside `<tr>` are moved out of the table), and rows that
/// are not inside any `<table>` are wrapped in one (otherwise the rows are
/// dropped).
fn normalize_rows(html: &str) -> Result<String> {
    let row_re = regex(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr\s*>")?;
    let cell_re = regex(r"(?i)<t[dh][\s>/]")?;
    let table_re = regex(r"(?i)<table[\s>]")?;

    let (Some(first), Some(last)) = (row_re.find(html), row_re.find_iter(html).last()) else {
        return Ok(html.to_string());
    };

    let rewrite = |region: &str| {
        row_re
            .replace_all(region, |caps: &Captures| {
                if cell_re.is_match(&caps[1]) {
                    caps[0].to_string()
                } else {
                    format!("<tr><td>{}</td></tr>", &caps[1])
                }
            })
            .into_owned()
    };

    if table_re.is_match(html) {
        return Ok(rewrite(html));
    }

    Ok(format!(
        "{}<table>{}</table>{}",
        &html[..first.start()],
        rewrite(&html[first.start()..last.end()]),
        &html[last.end()..]
    ))
}

fn parse_row(row: ElementRef<'_>, selectors: &RowSelectors) -> Option<SearchResult> {
    let link = row.select(&selectors.link).next()?;
    // Unlike a bare "starts with /" check, protocol-relative and redirect
    // links are resolved to absolute targets and kept; only same-site
    // paths are dropped.
    let url = resolve_href(link.value().attr("href")?)?;

    let title = element_text(&link);
    if title.is_empty() {
        return None;
    }

    let description = same_row_description(row, &title, selectors)
        .or_else(|| next_row_description(row, selectors))
        .unwrap_or_default();

    Some(SearchResult::new(title, url, description))
}

/// First cell after the link cell whose text is non-empty and differs from
/// the title.
fn same_row_description(
    row: ElementRef<'_>,
    title: &str,
    selectors: &RowSelectors,
) -> Option<String> {
    row.select(&selectors.cell)
        .skip(1)
        .map(|cell| element_text(&cell))
        .find(|text| !text.is_empty() && text != title)
}

/// First cell of the following row (or the row's own text when it has no
/// cells), only when that row has no link.
fn next_row_description(row: ElementRef<'_>, selectors: &RowSelectors) -> Option<String> {
    let next_row = row
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "tr")?;

    if next_row.select(&selectors.link).next().is_some() {
        return None;
    }

    let text = match next_row.select(&selectors.cell).next() {
        Some(cell) => element_text(&cell),
        None => element_text(&next_row),
    };
    (!text.is_empty()).then_some(text)
}
