//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::BriefError;

/// Wrap a fallible future with a deadline, mapping expiry to [`BriefError::Timeout`].
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, BriefError>>,
) -> Result<T, BriefError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(BriefError::Timeout(duration.as_millis() as u64)),
    }
}
