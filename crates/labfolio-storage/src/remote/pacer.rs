//! Fixed request pacing for the remote API.

use std::time::Duration;

/// Sleeps a fixed interval before every request.
///
/// Not adaptive: the pause is unconditional and does not depend on how long
/// ago the previous request was sent.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub async fn wait(&self) {
        if !self.interval.is_zero() {
            tracing::trace!(interval_ms = self.interval.as_millis() as u64, "Pacing remote request");
            tokio::time::sleep(self.interval).await;
        }
    }
}
