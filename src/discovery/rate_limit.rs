use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::DiscoveryError;
use crate::api::ApiError;

/// Wait applied when a throttle response carries no `Retry-After`
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Single chokepoint for remote calls.
///
/// Throttled calls are retried after the advised wait until they succeed or
/// fail some other way. Authorization failures are fatal, everything else
/// degrades to `Ok(None)`.
#[derive(Clone)]
pub struct RateLimitedCaller {
    sleep: Sleeper,
}

impl RateLimitedCaller {
    /// Create a caller that blocks the current thread while throttled
    pub fn new() -> Self {
        Self {
            sleep: Arc::new(std::thread::sleep),
        }
    }

    /// Create a caller with a custom wait function
    #[cfg(test)]
    pub fn with_sleeper(sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        Self {
            sleep: Arc::new(sleep),
        }
    }

    /// Run `op`, classifying its failure
    pub fn call<T, F>(&self, label: &str, mut op: F) -> Result<Option<T>, DiscoveryError>
    where
        F: FnMut() -> Result<T, ApiError>,
    {
        loop {
            match op() {
                Ok(value) => return Ok(Some(value)),
                Err(ApiError::Throttled { retry_after }) => {
                    let wait = Duration::from_secs(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS));
                    info!(call = label, wait_secs = wait.as_secs(), "rate limited, backing off");
                    (self.sleep)(wait);
                }
                Err(ApiError::Unauthorized { status, message }) => {
                    error!(call = label, status, %message, "authorization failed");
                    return Err(DiscoveryError::Unauthorized { status, message });
                }
                Err(ApiError::NotFound) => return Ok(None),
                Err(ApiError::Api { status, message }) => {
                    warn!(call = label, status, %message, "Spotify API error");
                    return Ok(None);
                }
                Err(ApiError::Unexpected(message)) => {
                    warn!(call = label, %message, "unexpected error");
                    return Ok(None);
                }
            }
        }
    }
}

impl Default for RateLimitedCaller {
    fn default() -> Self {
        Self::new()
    }
}
