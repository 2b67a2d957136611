use core::fmt;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::sleep;

/// Hands out one request builder at a time, pausing before each so the portal sees a polite,
/// strictly sequential client.
pub struct RateLimited<T> {
    t: Mutex<T>,
    delay: Duration,
}

impl<T> RateLimited<T> {
    pub fn new(t: T, delay: Duration) -> Self {
        Self {
            t: Mutex::new(t),
            delay,
        }
    }

    pub async fn get(&self) -> MutexGuard<'_, T> {
        let guard = self.t.lock().await;
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        guard
    }
}

impl<T: fmt::Debug> fmt::Debug for RateLimited<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RateLimited")
            .field("t", &self.t)
            .field("delay", &self.delay)
            .finish()
    }
}
