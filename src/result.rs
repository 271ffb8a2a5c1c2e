//! Search result types.

use serde::{Deserialize, Serialize};

/// Description used when no snippet could be located for a result.
pub const NO_DESCRIPTION: &str = "no description";

/// A single web result, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Result snippet, or [`NO_DESCRIPTION`].
    pub description: String,
}

impl SearchResult {
    /// Creates a new search result. An empty description becomes
    /// [`NO_DESCRIPTION`].
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            title: title.into(),
            url: url.into(),
            description: if description.trim().is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                description
            },
        }
    }
}

/// Where an instant answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Topic summary.
    Abstract,
    /// Computed or direct answer.
    DirectAnswer,
}

/// A structured answer returned alongside (or instead of) web results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantAnswer {
    /// Answer text.
    pub answer: String,
    /// Source name, or the answer type for direct answers.
    pub source: String,
    /// Source URL; empty when there is none.
    pub url: String,
    /// Which field the answer came from.
    pub kind: AnswerKind,
}

/// Overall outcome of an orchestrated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// Result of a combined instant-answer and web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    /// The query as given.
    pub query: String,
    /// Overall outcome.
    pub status: SearchStatus,
    /// Instant answer, when one was found.
    pub instant_answer: Option<InstantAnswer>,
    /// Web results, at most the requested count.
    pub web_results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CombinedResult {
    /// Builds a successful combined result.
    pub fn success(
        query: impl Into<String>,
        instant_answer: Option<InstantAnswer>,
        web_results: Vec<SearchResult>,
    ) -> Self {
        Self {
            query: query.into(),
            status: SearchStatus::Success,
            instant_answer,
            web_results,
            error: None,
        }
    }

    /// Builds an error result with no answer and no web results.
    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: SearchStatus::Error,
            instant_answer: None,
            web_results: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Returns true when `status` is `Success`.
    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_new() {
        let result = SearchResult::new("Title", "https://example.com", "Snippet");
        assert_eq!(result.title, "Title");
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.description, "Snippet");
    }

    #[test]
    fn test_search_result_empty_description_uses_placeholder() {
        let result = SearchResult::new("Title", "https://example.com", "  ");
        assert_eq!(result.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_answer_kind_serialization() {
        assert_eq!(serde_json::to_string(&AnswerKind::Abstract).unwrap(), "\"abstract\"");
        assert_eq!(
            serde_json::to_string(&AnswerKind::DirectAnswer).unwrap(),
            "\"direct_answer\""
        );
    }

    #[test]
    fn test_combined_success_serialization() {
        let combined = CombinedResult::success(
            "rust",
            None,
            vec![SearchResult::new("Rust", "https://rust-lang.org", "")],
        );
        assert!(combined.is_success());
        let json = serde_json::to_string(&combined).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"instant_answer\":null"));
        assert!(json.contains("\"web_results\":["));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_combined_failure() {
        let combined = CombinedResult::failure("rust", "boom");
        assert!(!combined.is_success());
        assert!(combined.web_results.is_empty());
        let json = serde_json::to_string(&combined).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"error\":\"boom\""));
    }
}
