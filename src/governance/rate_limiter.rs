// src/governance/rate_limiter.rs

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

/// Fixed-window call counter, one window per key.
///
/// Windows roll over lazily: the first call after `interval` has elapsed
/// starts a new window. Keys are never removed.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Counts this call against `key` and reports whether it is within budget.
    ///
    /// The rejected call is still counted, so exactly `max_calls` calls pass
    /// per window.
    pub fn allow(&self, key: &str, max_calls: u32, interval: Duration) -> bool {
        let now = Instant::now();
        let mut window = self
            .windows
            .entry(key.to_string())
            .or_insert(RateWindow {
                count: 0,
                window_start: now,
            });

        if now.duration_since(window.window_start) > interval {
            window.count = 0;
            window.window_start = now;
        }
        window.count = window.count.saturating_add(1);
        window.count <= max_calls
    }

    #[cfg(test)]
    fn count(&self, key: &str) -> u32 {
        self.windows.get(key).map(|w| w.count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[test]
    fn test_exactly_max_calls_pass() {
        let limiter = RateLimiter::new();
        let results: Vec<bool> = (0..3)
            .map(|_| limiter.allow("x", 2, Duration::from_millis(1000)))
            .collect();
        assert_eq!(results, vec![true, true, false]);
        assert_eq!(limiter.count("x"), 3);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        assert!(limiter.allow("a", 1, Duration::from_secs(60)));
        assert!(!limiter.allow("a", 1, Duration::from_secs(60)));
        assert!(limiter.allow("b", 1, Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_rolls_over_after_interval() {
        let limiter = RateLimiter::new();
        let interval = Duration::from_millis(1000);
        assert!(limiter.allow("x", 2, interval));
        assert!(limiter.allow("x", 2, interval));
        assert!(!limiter.allow("x", 2, interval));

        // Boundary is exclusive: exactly one interval later is still the same window.
        advance(interval).await;
        assert!(!limiter.allow("x", 2, interval));

        advance(Duration::from_millis(1)).await;
        assert!(limiter.allow("x", 2, interval));
        assert_eq!(limiter.count("x"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_key_starts_fresh_window() {
        let limiter = RateLimiter::new();
        let interval = Duration::from_secs(10);
        assert!(limiter.allow("x", 1, interval));

        advance(Duration::from_secs(3600)).await;
        assert!(limiter.allow("x", 1, interval));
        assert!(!limiter.allow("x", 1, interval));
    }
}
