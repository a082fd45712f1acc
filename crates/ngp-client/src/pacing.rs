//! Minimum-interval pacing between calls.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a lower bound on the time between successive recorded calls.
///
/// Callers `wait` before dispatching and `record` once the call was made.
/// The first call never waits.
#[derive(Debug, Clone)]
pub struct MinIntervalGuard {
    interval: Duration,
    last: Option<Instant>,
}

impl MinIntervalGuard {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Time still to wait at `now` before the next call may go out.
    fn remaining_at(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Suspend until the interval since the last recorded call has elapsed.
    /// Returns how long the caller was held back.
    pub async fn wait(&self) -> Duration {
        let remaining = self.remaining_at(Instant::now());
        if !remaining.is_zero() {
            tracing::debug!(wait_ms = remaining.as_millis() as u64, "pacing next call");
            tokio::time::sleep(remaining).await;
        }
        remaining
    }

    pub fn record(&mut self) {
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let guard = MinIntervalGuard::new(Duration::from_millis(3000));
        let start = Instant::now();
        assert_eq!(guard.wait().await, Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_calls_are_spaced() {
        let mut guard = MinIntervalGuard::new(Duration::from_millis(3000));
        guard.wait().await;
        guard.record();
        let first = guard.last.unwrap();

        let waited = guard.wait().await;
        guard.record();
        let second = guard.last.unwrap();

        assert_eq!(waited, Duration::from_millis(3000));
        assert!(second.duration_since(first) >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_only_for_remaining_delta() {
        let mut guard = MinIntervalGuard::new(Duration::from_millis(3000));
        guard.record();
        tokio::time::advance(Duration::from_millis(1200)).await;

        let waited = guard.wait().await;
        assert_eq!(waited, Duration::from_millis(1800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut guard = MinIntervalGuard::new(Duration::from_millis(3000));
        guard.record();
        tokio::time::advance(Duration::from_millis(5000)).await;
        assert_eq!(guard.wait().await, Duration::ZERO);
    }

    #[test]
    fn test_remaining_without_history_is_zero() {
        let guard = MinIntervalGuard::new(Duration::from_secs(1));
        assert_eq!(guard.remaining_at(Instant::now()), Duration::ZERO);
    }
}
