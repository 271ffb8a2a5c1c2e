//! Instant-answer lookup against the JSON endpoint.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RequestClass;
use crate::strategy::StrategyContext;
use crate::transport::HttpRequest;
use crate::{AnswerKind, InstantAnswer};

/// Resolves direct answers (abstracts, computations, definitions).
///
/// Never fails: every unusable outcome is reported as `None`.
#[derive(Clone)]
pub struct InstantAnswerResolver {
    context: StrategyContext,
}

impl InstantAnswerResolver {
    /// Creates a resolver over the shared strategy context.
    pub fn new(context: StrategyContext) -> Self {
        Self { context }
    }

    /// Looks up a direct answer for `query`.
    pub async fn resolve(&self, query: &str) -> Option<InstantAnswer> {
        let request = HttpRequest::get(&self.context.config().instant_url)
            .query("q", query)
            .query("format", "json")
            .query("no_redirect", "1")
            .query("no_html", "1")
            .query("skip_disambig", "1");

        let response = self
            .context
            .send(RequestClass::InstantAnswer, request)
            .await?;

        let answer = parse_answer(&response.body);
        debug!(
            "Instant answer for '{}': {}",
            query,
            if answer.is_some() { "found" } else { "none" }
        );
        answer
    }
}

/// Extracts an answer from the endpoint's JSON payload.
///
/// `AbstractText` is preferred over `Answer`; blank or non-string fields
/// count as absent.
pub fn parse_answer(body: &str) -> Option<InstantAnswer> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            warn!("Instant answer payload is not JSON: {}", e);
            return None;
        }
    };

    if let Some(text) = non_empty(&data, "AbstractText") {
        return Some(InstantAnswer {
            answer: text,
            source: string_field(&data, "AbstractSource"),
            url: string_field(&data, "AbstractURL"),
            kind: AnswerKind::Abstract,
        });
    }

    non_empty(&data, "Answer").map(|text| InstantAnswer {
        answer: text,
        source: string_field(&data, "AnswerType"),
        url: String::new(),
        kind: AnswerKind::DirectAnswer,
    })
}

fn non_empty(data: &Value, field: &str) -> Option<String> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn string_field(data: &Value, field: &str) -> String {
    data.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::random::Jitter;
    use crate::transport::{HttpResponse, HttpTransport};
    use crate::{Result, SearchError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct FakeTransport {
        outcome: std::result::Result<HttpResponse, String>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            self.outcome.clone().map_err(SearchError::Other)
        }
    }

    fn resolver(
        outcome: std::result::Result<HttpResponse, String>,
    ) -> (InstantAnswerResolver, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport {
            outcome,
            seen: Mutex::new(Vec::new()),
        });
        let context = StrategyContext::new(
            transport.clone(),
            ProviderConfig::default(),
            Jitter::seeded(4),
        );
        (InstantAnswerResolver::new(context), transport)
    }

    #[test]
    fn test_parse_answer_prefers_abstract() {
        let body = r#"{"AbstractText":"Rust is a language.","AbstractSource":"Wikipedia",
            "AbstractURL":"https://en.wikipedia.org/wiki/Rust","Answer":"ignored"}"#;
        let answer = parse_answer(body).unwrap();
        assert_eq!(answer.kind, AnswerKind::Abstract);
        assert_eq!(answer.answer, "Rust is a language.");
        assert_eq!(answer.source, "Wikipedia");
        assert_eq!(answer.url, "https://en.wikipedia.org/wiki/Rust");
    }

    #[test]
    fn test_parse_answer_direct() {
        let body = r#"{"AbstractText":"","Answer":"4","AnswerType":"calc"}"#;
        let answer = parse_answer(body).unwrap();
        assert_eq!(answer.kind, AnswerKind::DirectAnswer);
        assert_eq!(answer.answer, "4");
        assert_eq!(answer.source, "calc");
        assert_eq!(answer.url, "");
    }

    #[test]
    fn test_parse_answer_absent() {
        assert!(parse_answer(r#"{"AbstractText":"","Answer":""}"#).is_none());
        assert!(parse_answer("{}").is_none());
        assert!(parse_answer(r#"{"Answer":{"from":"widget"}}"#).is_none());
    }

    #[test]
    fn test_parse_answer_not_json() {
        assert!(parse_answer("<html>blocked</html>").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_sends_flags() {
        let (resolver, transport) = resolver(Ok(HttpResponse::new(200, r#"{"Answer":"4"}"#)));
        let answer = resolver.resolve("2+2").await.unwrap();
        assert_eq!(answer.answer, "4");

        let seen = transport.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.param("q"), Some("2+2"));
        assert_eq!(request.param("format"), Some("json"));
        assert_eq!(request.param("no_redirect"), Some("1"));
        assert_eq!(request.param("no_html"), Some("1"));
        assert_eq!(request.param("skip_disambig"), Some("1"));
        assert_eq!(request.timeout, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_uses_instant_answer_pacing() {
        let (resolver, _) = resolver(Ok(HttpResponse::new(200, "{}")));
        let start = tokio::time::Instant::now();
        assert!(resolver.resolve("rust").await.is_none());
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(300), "{:?}", elapsed);
        assert!(elapsed <= Duration::from_millis(801), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_non_200_is_none() {
        let (resolver, _) = resolver(Ok(HttpResponse::new(500, r#"{"Answer":"4"}"#)));
        assert!(resolver.resolve("2+2").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_transport_error_is_none() {
        let (resolver, _) = resolver(Err("connection reset".to_string()));
        assert!(resolver.resolve("2+2").await.is_none());
    }
}
