use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Token-bucket throttle for outbound annotation calls. The bucket starts
/// full at `burst` tokens and refills at `requests_per_minute / 60` tokens
/// per second; `acquire` waits until a token is available. A rate of zero
/// disables throttling entirely, which is how tests and the mock provider
/// run without real-time delays.
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    updated: Instant,
}

impl TokenBucket {
    pub fn new(burst: u32, requests_per_minute: u32) -> Self {
        let capacity = f64::from(burst.max(1));
        Self {
            capacity,
            refill_per_sec: f64::from(requests_per_minute) / 60.0,
            state: Mutex::new(BucketState {
                tokens: capacity,
                updated: Instant::now(),
            }),
        }
    }

    pub fn unthrottled() -> Self {
        Self::new(1, 0)
    }

    pub async fn acquire(&self) {
        if self.refill_per_sec <= 0.0 {
            return;
        }

        loop {
            // The lock is released before sleeping; waiters never hold it
            // across a suspension point.
            let wait_secs = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.updated).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
                state.updated = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                (1.0 - state.tokens) / self.refill_per_sec
            };

            tokio::time::sleep(Duration::from_secs_f64(wait_secs)).await;
        }
    }
}
