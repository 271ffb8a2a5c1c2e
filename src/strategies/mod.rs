//! Web-result strategies for the DuckDuckGo provider.

mod html;
mod lite;

pub use html::{HtmlScraper, RESULT_PATTERNS, SNIPPET_SELECTORS, TITLE_SELECTORS};
pub use lite::LiteScraper;

/// Page parsers, exposed for offline testing against saved pages.
pub mod parse {
    pub use super::html::{parse_results as parse_html, select_containers};
    pub use super::lite::parse_results as parse_lite;
}
