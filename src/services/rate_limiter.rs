//! Token-bucket admission gate for calls to quota-limited services.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

use crate::error::RateLimitError;
use crate::models::RateLimitConfig;
use crate::utils::CancellationToken;

/// Shortest wait between refill checks.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Token bucket: `burst` permits, refilled at one permit per `interval`.
///
/// Time comes from `tokio::time`, so tests can drive it with a paused clock.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<BucketState>,
    interval: Duration,
    capacity: f64,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a full bucket. `burst` is clamped to at least 1.
    pub fn new(interval: Duration, burst: u32) -> Self {
        let capacity = f64::from(burst.max(1));
        Self {
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            interval: interval.max(MIN_WAIT),
            capacity,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.interval(), config.burst)
    }

    /// Wait for a permit, or fail with [`RateLimitError::Aborted`] once
    /// `cancel` fires.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), RateLimitError> {
        loop {
            if cancel.is_cancelled() {
                return Err(RateLimitError::Aborted);
            }

            let wait = match self.try_acquire_at(Instant::now()).await {
                None => return Ok(()),
                Some(wait) => wait,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RateLimitError::Aborted),
                _ = sleep(wait) => {}
            }
        }
    }

    /// Take a permit if one is available, otherwise report how long until the next one.
    async fn try_acquire_at(&self, now: Instant) -> Option<Duration> {
        let mut state = self.state.lock().await;
        self.refill(&mut state, now);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return None;
        }

        let missing = 1.0 - state.tokens;
        Some(Duration::from_secs_f64(missing * self.interval.as_secs_f64()).max(MIN_WAIT))
    }

    /// Permits currently available, after refilling.
    pub async fn available(&self) -> u32 {
        let mut state = self.state.lock().await;
        self.refill(&mut state, Instant::now());
        state.tokens.floor() as u32
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(state.last_refill);
        state.last_refill = now;
        state.tokens = (state.tokens + elapsed.as_secs_f64() / self.interval.as_secs_f64())
            .min(self.capacity);
    }
}
