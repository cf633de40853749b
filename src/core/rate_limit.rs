use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Run-wide request pacer.
///
/// Every probe calls [`RateLimiter::wait`] first, so consecutive probes are
/// spaced at least `1 / rate` seconds apart regardless of which URL they hit.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// `interval` is the minimum spacing between requests, `1 / rate`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}
