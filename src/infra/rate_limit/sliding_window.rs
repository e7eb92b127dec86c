use crate::domain::ports::{RateLimitDecision, RateLimiter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter over an in-memory map of timestamps.
/// Denied attempts are not recorded, so hammering the endpoint does not
/// extend a client's lockout. Single-process only: state is neither
/// persisted nor shared across instances.
pub struct SlidingWindowLimiter {
    window: Duration,
    max_attempts: usize,
    buckets: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_attempts: usize) -> Self {
        Self {
            window,
            max_attempts,
            buckets: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowLimiter {
    async fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let stamps = buckets.entry(key.to_string()).or_default();
        stamps.retain(|t| now.duration_since(*t) < self.window);

        if stamps.len() >= self.max_attempts {
            // Pushed in time order, so the front is the oldest stamp and
            // the first one to age out of the window.
            let oldest = stamps.first().copied().unwrap_or(now);
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return RateLimitDecision {
                allowed: false,
                limit: self.max_attempts as u32,
                remaining: 0,
                retry_after_secs: retry_after.as_secs().max(1),
            };
        }

        stamps.push(now);
        RateLimitDecision {
            allowed: true,
            limit: self.max_attempts as u32,
            remaining: (self.max_attempts - stamps.len()) as u32,
            retry_after_secs: 0,
        }
    }
}
