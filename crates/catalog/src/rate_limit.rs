//! Sliding-window request admission for catalog clients.
//!
//! Each provider client owns one [`RateLimiter`]; instances share no
//! state with each other. [`RateLimiter::admit`] suspends the caller
//! until a request can proceed without exceeding `max_requests` per
//! `window`. Retry order under contention is FIFO-ish (whichever
//! sleeper wakes first wins), and a pending wait cannot be aborted —
//! callers that need cancellation must drop the whole future.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Sliding-window rate limiter.
///
/// Keeps the admission timestamps of the trailing window in order.
/// After pruning, the log never holds more than `max_requests`
/// entries. Timestamps are [`tokio::time::Instant`]s so tests can run
/// under a paused clock.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window`.
    ///
    /// A `max_requests` of 0 is treated as 1 — a limiter that can
    /// never admit anything would deadlock every caller.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            admissions: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a request may proceed, then record its admission.
    ///
    /// Prunes timestamps older than the window; if the window is at
    /// capacity, sleeps until the oldest admission ages out and tries
    /// again. The internal lock is never held across the sleep.
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut admissions = self
                    .admissions
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());

                let now = Instant::now();
                while let Some(&oldest) = admissions.front() {
                    if oldest + self.window <= now {
                        admissions.pop_front();
                    } else {
                        break;
                    }
                }

                if admissions.len() < self.max_requests {
                    admissions.push_back(now);
                    return;
                }

                // Full window: wait for the oldest entry to age out.
                let oldest = *admissions.front().expect("window at capacity is non-empty");
                oldest + self.window - now
            };

            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
            tokio::time::sleep(wait).await;
        }
    }

    /// Number of admissions currently inside the window.
    pub fn in_flight(&self) -> usize {
        let mut admissions = self
            .admissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        while let Some(&oldest) = admissions.front() {
            if oldest + self.window <= now {
                admissions.pop_front();
            } else {
                break;
            }
        }
        admissions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn admits_up_to_capacity_without_waiting() {
        let limiter = RateLimiter::new(3, Duration::from_secs(10));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.admit().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_flight(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn over_capacity_call_waits_for_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(5));

        limiter.admit().await;
        limiter.admit().await;

        let start = Instant::now();
        limiter.admit().await;

        // The third call must wait until the first admission ages out.
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn no_sub_window_exceeds_max_requests() {
        let max = 3;
        let window = Duration::from_secs(4);
        let limiter = RateLimiter::new(max, window);

        let mut admitted = Vec::new();
        for _ in 0..12 {
            limiter.admit().await;
            admitted.push(Instant::now());
        }

        // For every admission i, the (i + max)-th admission must be at
        // least a full window later — otherwise some window of length
        // W contained more than max calls.
        for pair in admitted.windows(max + 1) {
            let span = pair[max] - pair[0];
            assert!(
                span >= window,
                "window violated: {} calls within {:?}",
                max + 1,
                span
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn window_slides_rather_than_resets() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));

        limiter.admit().await;
        tokio::time::advance(Duration::from_secs(6)).await;
        limiter.admit().await;

        // 6s in: first admission expires at t=10, so the third call
        // should wait 4 more seconds, not a full 10.
        let start = Instant::now();
        limiter.admit().await;
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_all_get_through() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(2, Duration::from_secs(1)));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.admit().await;
                    Instant::now()
                })
            })
            .collect();

        let mut times = Vec::new();
        for task in tasks {
            times.push(task.await.unwrap());
        }
        times.sort();

        // 6 calls at 2-per-second: the last must land at least 2
        // full windows after the first.
        assert!(times[5] - times[0] >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_capacity_clamped_to_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        // Must not deadlock.
        limiter.admit().await;
        assert_eq!(limiter.in_flight(), 1);
    }
}
