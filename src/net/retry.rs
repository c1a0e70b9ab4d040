//! Call-site exponential backoff.
//!
//! The gateway itself only applies a fixed retry count. Callers that want to
//! wait out an outage (dashboard refresh, history paging) wrap a call in
//! `with_backoff`, which retries while `ApiError::should_retry` holds.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;
use std::time::Duration;

use super::error::ApiError;
use super::transport::Timer;

const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based): `1s * 2^(attempt-1)`
/// capped at 30s, plus `jitter` seconds with `jitter` clamped to `[0, 1]`.
pub fn backoff_delay(attempt: u32, jitter: f64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let base = BASE_DELAY.saturating_mul(1 << exponent).min(MAX_DELAY);
    let jitter = if jitter.is_finite() { jitter.clamp(0.0, 1.0) } else { 0.0 };
    base + Duration::from_secs_f64(jitter)
}

/// Jitter source for browser builds; zero elsewhere.
pub fn random_jitter() -> f64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Math::random()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0.0
    }
}

/// Run `op` up to `max_attempts` times, sleeping `backoff_delay` between
/// attempts while the error is retryable.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted or the error is not
/// retryable.
pub async fn with_backoff<T, F, Fut>(
    timer: &dyn Timer,
    max_attempts: u32,
    mut jitter: impl FnMut() -> f64,
    mut op: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && e.should_retry() => {
                let delay = backoff_delay(attempt, jitter());
                log::debug!(
                    "backoff: attempt {attempt}/{max_attempts} failed ({}), retrying in {}ms",
                    e.kind,
                    delay.as_millis()
                );
                timer.sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
