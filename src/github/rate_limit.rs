// Advisory rate-limit tracking.
// Mirrors GitHub's X-RateLimit-* headers and rolls the window over lazily.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::Clock;

/// Unauthenticated GitHub quota, also the fallback when headers are missing.
pub const DEFAULT_LIMIT: u64 = 60;

/// Length of a quota window when the reset time has passed.
const WINDOW_SECS: i64 = 60 * 60;

/// Point-in-time copy of the rate-limit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitState {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: DateTime<Utc>,
}

/// Tracks remaining calls and when the quota resets.
///
/// Nothing here blocks a request; callers ask `has_quota` first.
pub struct RateLimiter {
    state: RateLimitState,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            state: RateLimitState {
                remaining: DEFAULT_LIMIT,
                limit: DEFAULT_LIMIT,
                reset_at: now + chrono::Duration::seconds(WINDOW_SECS),
            },
            clock,
        }
    }

    /// Overwrite the state with values reported by the API.
    pub fn record_from_headers(&mut self, remaining: u64, limit: u64, reset_epoch_seconds: i64) {
        let limit = limit.max(1);
        self.state = RateLimitState {
            remaining: remaining.min(limit),
            limit,
            reset_at: DateTime::from_timestamp(reset_epoch_seconds, 0).unwrap_or_default(),
        };
    }

    /// Whether another call may be made. Rolls the window over once the
    /// reset time has been reached.
    pub fn has_quota(&mut self) -> bool {
        let now = self.clock.now();
        if now >= self.state.reset_at {
            self.state.remaining = self.state.limit;
            self.state.reset_at = now + chrono::Duration::seconds(WINDOW_SECS);
        }
        self.state.remaining > 0
    }

    pub fn time_until_reset(&self) -> Duration {
        (self.state.reset_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn snapshot(&self) -> RateLimitState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new();
        (RateLimiter::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_initial_state_has_quota() {
        let (mut limiter, _clock) = limiter();
        assert!(limiter.has_quota());
        let state = limiter.snapshot();
        assert_eq!(state.remaining, DEFAULT_LIMIT);
        assert_eq!(state.limit, DEFAULT_LIMIT);
        assert_eq!(limiter.time_until_reset(), Duration::from_secs(3600));
    }

    #[test]
    fn test_exhausted_until_reset() {
        let (mut limiter, clock) = limiter();
        let reset = clock.now().timestamp() + 10;
        limiter.record_from_headers(0, 60, reset);

        assert!(!limiter.has_quota());
        clock.advance(chrono::Duration::seconds(9));
        assert!(!limiter.has_quota());
        assert_eq!(limiter.snapshot().remaining, 0);

        clock.advance(chrono::Duration::seconds(1));
        assert!(limiter.has_quota());
        let state = limiter.snapshot();
        assert_eq!(state.remaining, 60);
        assert_eq!(state.reset_at, clock.now() + chrono::Duration::hours(1));
    }

    #[test]
    fn test_record_clamps_remaining_to_limit() {
        let (mut limiter, clock) = limiter();
        limiter.record_from_headers(100, 0, clock.now().timestamp() + 60);
        let state = limiter.snapshot();
        assert_eq!(state.limit, 1);
        assert_eq!(state.remaining, 1);
    }

    #[test]
    fn test_time_until_reset_never_negative() {
        let (mut limiter, clock) = limiter();
        limiter.record_from_headers(5, 60, clock.now().timestamp() - 30);
        assert_eq!(limiter.time_until_reset(), Duration::ZERO);
    }
}
