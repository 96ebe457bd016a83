//! Bounded exponential backoff for transient provider failures.

use super::error::ProviderError;
use super::provider::RetryPolicy;
use std::future::Future;
use std::time::Duration;

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based): base × 2^attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(1u64 << attempt.min(16)))
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retries are used up. The last error is returned.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "[LLM] {} attempt {} failed ({}), retrying in {}ms",
                    label,
                    attempt + 1,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
