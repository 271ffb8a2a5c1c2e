//! Provider endpoints, locale hints and per-request-class tuning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// Class of outbound request. Each class has its own timeout and delay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestClass {
    /// Form POST against the lite endpoint.
    Primary,
    /// GET against the full HTML endpoint.
    Fallback,
    /// GET against the instant-answer JSON endpoint.
    InstantAnswer,
}

/// Inclusive window for the randomized pre-request delay, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayWindow {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl DelayWindow {
    /// Creates a window; bounds given in the wrong order are swapped.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms <= max_ms {
            Self { min_ms, max_ms }
        } else {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        }
    }

    /// Returns the window with its bounds in ascending order.
    pub fn normalized(self) -> Self {
        Self::new(self.min_ms, self.max_ms)
    }

    /// Returns true when `delay` (truncated to whole milliseconds) lies in the window.
    pub fn contains(&self, delay: Duration) -> bool {
        let ms = delay.as_millis() as u64;
        ms >= self.min_ms && ms <= self.max_ms
    }
}

/// Timeout and pacing for one request class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Delay applied before each request.
    pub delay: DelayWindow,
}

impl StrategyConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the DuckDuckGo provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Lightweight, script-free search endpoint (form POST).
    pub lite_url: String,
    /// Full search endpoint (GET).
    pub html_url: String,
    /// Instant-answer JSON endpoint (GET).
    pub instant_url: String,
    /// Region hint sent as `kl` to the lite endpoint.
    pub region: String,
    /// Accept-Language header presented by every identity.
    pub accept_language: String,
    /// Lite endpoint settings.
    pub primary: StrategyConfig,
    /// Full HTML endpoint settings.
    pub fallback: StrategyConfig,
    /// Instant-answer endpoint settings.
    pub instant_answer: StrategyConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            lite_url: "https://lite.duckduckgo.com/lite/".to_string(),
            html_url: "https://duckduckgo.com/".to_string(),
            instant_url: "https://duckduckgo.com/".to_string(),
            region: "kr-kr".to_string(),
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            primary: StrategyConfig {
                timeout_secs: 15,
                delay: DelayWindow::new(500, 1500),
            },
            fallback: StrategyConfig {
                timeout_secs: 20,
                delay: DelayWindow::new(1000, 2000),
            },
            instant_answer: StrategyConfig {
                timeout_secs: 10,
                delay: DelayWindow::new(300, 800),
            },
        }
    }
}

impl ProviderConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Other(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parses a configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: ProviderConfig = serde_json::from_str(raw)
            .map_err(|e| SearchError::Parse(format!("Invalid config: {}", e)))?;
        for class in [
            RequestClass::Primary,
            RequestClass::Fallback,
            RequestClass::InstantAnswer,
        ] {
            let settings = config.class_mut(class);
            settings.delay = settings.delay.normalized();
        }
        Ok(config)
    }

    /// Returns the settings for a request class.
    pub fn class(&self, class: RequestClass) -> &StrategyConfig {
        match class {
            RequestClass::Primary => &self.primary,
            RequestClass::Fallback => &self.fallback,
            RequestClass::InstantAnswer => &self.instant_answer,
        }
    }

    fn class_mut(&mut self, class: RequestClass) -> &mut StrategyConfig {
        match class {
            RequestClass::Primary => &mut self.primary,
            RequestClass::Fallback => &mut self.fallback,
            RequestClass::InstantAnswer => &mut self.instant_answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default_windows() {
        let config = ProviderConfig::default();
        assert_eq!(config.primary.delay, DelayWindow::new(500, 1500));
        assert_eq!(config.fallback.delay, DelayWindow::new(1000, 2000));
        assert_eq!(config.instant_answer.delay, DelayWindow::new(300, 800));
    }

    #[test]
    fn test_provider_config_default_timeouts() {
        let config = ProviderConfig::default();
        assert_eq!(config.class(RequestClass::Primary).timeout(), Duration::from_secs(15));
        assert_eq!(config.class(RequestClass::Fallback).timeout(), Duration::from_secs(20));
        assert_eq!(
            config.class(RequestClass::InstantAnswer).timeout(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_delay_window_swaps_bounds() {
        let window = DelayWindow::new(900, 100);
        assert_eq!(window.min_ms, 100);
        assert_eq!(window.max_ms, 900);
    }

    #[test]
    fn test_delay_window_contains() {
        let window = DelayWindow::new(500, 1500);
        assert!(window.contains(Duration::from_millis(500)));
        assert!(window.contains(Duration::from_millis(1500)));
        assert!(!window.contains(Duration::from_millis(499)));
        assert!(!window.contains(Duration::from_millis(1501)));
    }

    #[test]
    fn test_from_json_partial_override() {
        let json = r#"{"region":"us-en","fallback":{"timeout_secs":5,"delay":{"min_ms":10,"max_ms":20}}}"#;
        let config = ProviderConfig::from_json(json).unwrap();
        assert_eq!(config.region, "us-en");
        assert_eq!(config.fallback.timeout_secs, 5);
        assert_eq!(config.fallback.delay, DelayWindow::new(10, 20));
        assert_eq!(config.primary, ProviderConfig::default().primary);
        assert_eq!(config.lite_url, "https://lite.duckduckgo.com/lite/");
    }

    #[test]
    fn test_from_json_normalizes_inverted_window() {
        let json = r#"{"primary":{"timeout_secs":1,"delay":{"min_ms":300,"max_ms":100}}}"#;
        let config = ProviderConfig::from_json(json).unwrap();
        assert_eq!(config.primary.delay.min_ms, 100);
        assert_eq!(config.primary.delay.max_ms, 300);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = ProviderConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = ProviderConfig::from_json_file("/nonexistent/ddg.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_request_class_serialization() {
        let json = serde_json::to_string(&RequestClass::InstantAnswer).unwrap();
        assert_eq!(json, "\"instant_answer\"");
    }
}
