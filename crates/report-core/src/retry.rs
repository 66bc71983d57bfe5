use std::future::Future;
use std::time::Duration;

use crate::{ProviderError, ProviderResult};

/// Run `operation` up to `max_attempts` times with exponential backoff
/// between attempts, returning the first success or the last error.
pub async fn retry_with_backoff<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    base_delay: Duration,
    operation: F,
) -> ProviderResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let attempts = max_attempts.max(1);
    let mut delay = base_delay;
    let mut last_err = ProviderError::Api(format!("{label}: no attempts made"));

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    "{} attempt {}/{} failed: {}",
                    label,
                    attempt,
                    attempts,
                    e
                );
                last_err = e;
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    Err(last_err)
}
