//! Request spacing
//!
//! The harvester fetches one page at a time; the throttle enforces the configured
//! minimum delay between the start of one request and the next.

use std::time::{Duration, Instant};

/// Enforces a minimum delay between successive requests
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between requests
    delay: Duration,

    /// When the previous request was released
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// How long a request issued at `now` would have to wait
    ///
    /// Returns None if a request may go out immediately.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let ready_at = last + self.delay;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Marks a request as released at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Sleeps until the next request may be sent, then records it
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Throttling for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }
}
