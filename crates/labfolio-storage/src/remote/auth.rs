//! Bearer token cache for the remote API.

use crate::traits::StorageResult;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Age after which a cached token is considered stale and re-issued.
pub const TOKEN_STALENESS: Duration = Duration::from_secs(10 * 60);

struct CachedToken {
    value: String,
    issued_at: Instant,
}

/// Time-based token cache
///
/// The freshness check and the refresh run under one lock, so concurrent
/// callers that find the token stale trigger a single refresh and all reuse
/// its result. Expiry is not read from the token itself.
pub struct TokenCache {
    cached: Mutex<Option<CachedToken>>,
    staleness: Duration,
}

impl Debug for TokenCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TokenCache")
            .field("staleness", &self.staleness)
            .finish_non_exhaustive()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(TOKEN_STALENESS)
    }
}

impl TokenCache {
    pub fn new(staleness: Duration) -> Self {
        Self {
            cached: Mutex::new(None),
            staleness,
        }
    }

    /// Return the cached token, calling `refresh` first if it is absent or stale.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> StorageResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StorageResult<String>>,
    {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.issued_at.elapsed() < self.staleness {
                return Ok(token.value.clone());
            }
            tracing::debug!(
                age_secs = token.issued_at.elapsed().as_secs(),
                "Remote storage token is stale"
            );
        }

        let value = refresh().await?;
        *cached = Some(CachedToken {
            value: value.clone(),
            issued_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}
