//! HTTP transport abstraction.
//!
//! Strategies describe requests as plain data and hand them to an
//! [`HttpTransport`]. The production implementation wraps one shared reqwest
//! client; tests substitute canned responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::identity::HeaderSet;
use crate::{Result, SearchError};

/// HTTP method used by the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// An outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Target URL without query parameters.
    pub url: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// Form body fields, sent url-encoded for POST requests.
    pub form: Vec<(String, String)>,
    /// Request headers.
    pub headers: HeaderSet,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Starts a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Starts a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            form: Vec::new(),
            headers: Vec::new(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends a form field.
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Appends headers.
    pub fn headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Looks up a query or form parameter by name.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .chain(self.form.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response. The body is read fully before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for status 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes HTTP requests.
///
/// Implementations must be safe to share across concurrent queries. A
/// non-200 status is a successful `execute`; only transport faults are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Transport backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Creates a transport that routes all requests through a proxy
    /// (`http://`, `https://` or `socks5://`).
    pub fn with_proxy(proxy_url: &str) -> Result<Self> {
        Self::build(Some(proxy_url))
    }

    /// Creates a transport with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build(proxy_url: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy_url) = proxy_url {
            debug!("Using proxy: {}", proxy_url);
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| SearchError::Other(format!("Failed to create proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = if request.query.is_empty() {
            url::Url::parse(&request.url)?
        } else {
            url::Url::parse_with_params(&request.url, &request.query)?
        };

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url).form(&request.form),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.timeout(request.timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::post("https://lite.duckduckgo.com/lite/")
            .form("q", "rust")
            .form("kl", "kr-kr")
            .headers(vec![("User-Agent".to_string(), "test".to_string())])
            .timeout(Duration::from_secs(3));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.param("q"), Some("rust"));
        assert_eq!(request.param("kl"), Some("kr-kr"));
        assert_eq!(request.param("missing"), None);
        assert_eq!(request.header("user-agent"), Some("test"));
        assert_eq!(request.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_get_request_query_params() {
        let request = HttpRequest::get("https://duckduckgo.com/")
            .query("q", "2+2")
            .query("format", "json");
        assert_eq!(request.method, Method::Get);
        assert!(request.form.is_empty());
        assert_eq!(request.param("format"), Some("json"));
    }

    #[test]
    fn test_response_is_ok() {
        assert!(HttpResponse::new(200, "").is_ok());
        assert!(!HttpResponse::new(503, "").is_ok());
        assert!(!HttpResponse::new(202, "").is_ok());
    }

    #[test]
    fn test_reqwest_transport_new() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn test_reqwest_transport_with_proxy() {
        assert!(ReqwestTransport::with_proxy("socks5://127.0.0.1:1080").is_ok());
    }

    #[test]
    fn test_reqwest_transport_with_client() {
        let client = Client::builder().build().unwrap();
        let _transport = ReqwestTransport::with_client(client);
    }

    #[tokio::test]
    async fn test_reqwest_transport_rejects_bad_url() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport.execute(HttpRequest::get("not a url")).await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, SearchError::UrlParse(_)));
    }
}
