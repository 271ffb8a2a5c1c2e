//! Randomized request pacing.

use std::time::Duration;

use tracing::debug;

use crate::config::{ProviderConfig, RequestClass};
use crate::random::Jitter;

/// Sleeps a random delay before each outbound request.
///
/// The wait suspends only the calling task; concurrent queries pace
/// independently.
#[derive(Debug, Clone)]
pub struct Pacer {
    jitter: Jitter,
    config: ProviderConfig,
}

impl Pacer {
    /// Creates a pacer using the delay windows in `config`.
    pub fn new(jitter: Jitter, config: ProviderConfig) -> Self {
        Self { jitter, config }
    }

    /// Draws the delay for a request class without waiting.
    pub fn delay_for(&self, class: RequestClass) -> Duration {
        let window = self.config.class(class).delay;
        Duration::from_millis(self.jitter.between(window.min_ms, window.max_ms))
    }

    /// Waits for a freshly drawn delay and returns it.
    pub async fn before_request(&self, class: RequestClass) -> Duration {
        let delay = self.delay_for(class);
        debug!("Pacing {:?} request for {}ms", class, delay.as_millis());
        tokio::time::sleep(delay).await;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn pacer(seed: u64) -> Pacer {
        Pacer::new(Jitter::seeded(seed), ProviderConfig::default())
    }

    #[test]
    fn test_delay_within_class_windows() {
        let pacer = pacer(11);
        let config = ProviderConfig::default();
        for class in [
            RequestClass::Primary,
            RequestClass::Fallback,
            RequestClass::InstantAnswer,
        ] {
            for _ in 0..50 {
                let delay = pacer.delay_for(class);
                assert!(config.class(class).delay.contains(delay), "{:?} {:?}", class, delay);
            }
        }
    }

    #[test]
    fn test_seeded_delays_repeat() {
        let a = pacer(3);
        let b = pacer(3);
        assert_eq!(a.delay_for(RequestClass::Primary), b.delay_for(RequestClass::Primary));
    }

    #[tokio::test(start_paused = true)]
    async fn test_before_request_sleeps_drawn_delay() {
        let pacer = pacer(21);
        let start = Instant::now();
        let delay = pacer.before_request(RequestClass::Fallback).await;
        assert!(start.elapsed() >= delay);
        assert!(delay >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waits_do_not_serialize() {
        let pacer = pacer(8);
        let start = Instant::now();
        let (a, b) = tokio::join!(
            pacer.before_request(RequestClass::InstantAnswer),
            pacer.before_request(RequestClass::InstantAnswer)
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= a.max(b));
        assert!(elapsed < a + b);
    }
}
