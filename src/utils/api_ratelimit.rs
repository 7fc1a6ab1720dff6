//! Outbound rate limiter for the market data API (sliding one second window)
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct ApiRateLimiter {
    state: Mutex<Window>,
}

struct Window {
    /// Queue of request timestamps (last `window`)
    request_times: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl Window {
    fn check_and_record(&mut self, now: Instant) -> Duration {
        // Remove old timestamps outside the window
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) > self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        // If we're at the limit, calculate how long to wait
        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        self.request_times.push_back(now);
        Duration::from_secs(0)
    }
}

impl ApiRateLimiter {
    pub fn new(max_requests_per_second: usize) -> Self {
        Self::with_window(max_requests_per_second, Duration::from_secs(1))
    }

    pub fn with_window(max_requests: usize, window: Duration) -> Self {
        Self {
            state: Mutex::new(Window {
                request_times: VecDeque::new(),
                max_requests: max_requests.max(1),
                window,
            }),
        }
    }

    /// How long the caller would have to wait; records the request when it is zero
    fn check_and_record(&self) -> Duration {
        let mut window = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        window.check_and_record(Instant::now())
    }

    /// Wait until a request slot is free, then claim it
    pub async fn acquire(&self) {
        loop {
            let wait_duration = self.check_and_record();
            if wait_duration.is_zero() {
                return;
            }
            tracing::debug!("Market data API rate limit: waiting {}ms", wait_duration.as_millis());
            tokio::time::sleep(wait_duration).await;
        }
    }
}
