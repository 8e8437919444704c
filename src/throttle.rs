use std::sync::Arc;
use std::time::Duration;

use governor::{
    clock::DefaultClock, state::direct::NotKeyed, state::InMemoryState, Quota, RateLimiter,
};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket pacing destination work. Clones share one bucket, so every
/// run in the process draws from the same budget.
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<DirectRateLimiter>,
    interval: Duration,
}

impl Throttle {
    /// One cell per `interval`, no burst. `None` for a zero interval.
    pub fn new(interval: Duration) -> Option<Self> {
        let quota = Quota::with_period(interval)?;
        Some(Throttle {
            limiter: Arc::new(RateLimiter::direct(quota)),
            interval,
        })
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
