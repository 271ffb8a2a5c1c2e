//! Browser identity rotation.
//!
//! Every outbound request presents a header set drawn at random from a pool of
//! desktop browser signatures. Draws are independent; nothing is sticky across
//! requests.

use crate::random::Jitter;

/// Desktop browser user-agent strings.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Ordered request headers presented as one browser.
pub type HeaderSet = Vec<(String, String)>;

/// A single browser identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: &'static str,
    /// Value of the `Accept-Language` header.
    pub accept_language: String,
}

impl Identity {
    /// Returns the full header set for this identity.
    ///
    /// Compression is disabled so response bodies can be handed to the parser
    /// as-is.
    pub fn headers(&self) -> HeaderSet {
        vec![
            ("User-Agent".to_string(), self.user_agent.to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
            ("Accept-Encoding".to_string(), "identity".to_string()),
            ("DNT".to_string(), "1".to_string()),
            ("Connection".to_string(), "keep-alive".to_string()),
            ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ]
    }
}

/// Draws identities uniformly from [`USER_AGENTS`].
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    jitter: Jitter,
    accept_language: String,
}

impl IdentityProvider {
    /// Creates a provider drawing from `USER_AGENTS` with `jitter`.
    pub fn new(jitter: Jitter, accept_language: impl Into<String>) -> Self {
        Self {
            jitter,
            accept_language: accept_language.into(),
        }
    }

    /// Returns a freshly drawn identity.
    pub fn next_identity(&self) -> Identity {
        let user_agent = USER_AGENTS[self.jitter.index(USER_AGENTS.len())];
        Identity {
            user_agent,
            accept_language: self.accept_language.clone(),
        }
    }

    /// Shorthand for `next_identity().headers()`.
    pub fn next_headers(&self) -> HeaderSet {
        self.next_identity().headers()
    }
}
