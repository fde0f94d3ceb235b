use std::{collections::VecDeque, time::Duration};

use tokio::time::{sleep_until, Instant};

/// Sliding-window limiter: at most `calls` acquisitions per `period`.
#[derive(Debug)]
pub struct RateLimiter {
    calls: usize,
    period: Duration,
    last_calls: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(calls: usize, period: Duration) -> RateLimiter {
        let calls = calls.max(1);
        RateLimiter {
            calls,
            period,
            last_calls: VecDeque::with_capacity(calls),
        }
    }

    /// Waits until another call fits into the window and records it.
    pub async fn wait(&mut self) {
        let now = Instant::now();
        while let Some(oldest) = self.last_calls.front() {
            if now.duration_since(*oldest) > self.period {
                self.last_calls.pop_front();
            } else {
                break;
            }
        }

        if self.last_calls.len() >= self.calls {
            if let Some(oldest) = self.last_calls.pop_front() {
                sleep_until(oldest + self.period).await;
            }
        }

        self.last_calls.push_back(Instant::now());
    }
}
