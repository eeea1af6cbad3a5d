use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::QueueKey;

/// Per-key exponential backoff, per `spec.md` §5's "rate-limited work
/// queue".
///
/// Mirrors client-go's `DefaultControllerRateLimiter`: each observed
/// failure doubles the delay for that key, capped at `max_delay`; a
/// success forgets the key's failure count entirely.
#[derive(Debug)]
pub struct Backoff {
    base_delay: Duration,
    max_delay: Duration,
    failures: Mutex<HashMap<QueueKey, u32>>,
}

impl Backoff {
    /// Builds a backoff with the given base and maximum delay.
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self { base_delay, max_delay, failures: Mutex::new(HashMap::new()) }
    }

    /// Records a failure for `key` and returns the delay the caller should
    /// wait before retrying it.
    pub fn next_backoff(&self, key: &QueueKey) -> Duration {
        let mut failures = self.failures.lock().expect("backoff mutex poisoned");
        let count = failures.entry(key.clone()).or_insert(0);
        let delay = self.base_delay.saturating_mul(1u32.checked_shl(*count).unwrap_or(u32::MAX));
        *count = count.saturating_add(1);
        delay.min(self.max_delay)
    }

    /// Forgets `key`'s failure count, e.g. after it reconciles successfully.
    pub fn forget(&self, key: &QueueKey) {
        self.failures.lock().expect("backoff mutex poisoned").remove(key);
    }
}

impl Default for Backoff {
    /// The same 5ms/1000s bounds as client-go's default rate limiter.
    fn default() -> Self {
        Self::new(Duration::from_millis(5), Duration::from_secs(1000))
    }
}
