// Retry helper with linear backoff, shared by every provider call path.
//
// Backoff before retry N (1-indexed) is N * 100ms — linear, not
// exponential, which bounds the worst-case total wait to
// retries*(retries+1)/2 * 100ms. The last failure is surfaced to the
// caller unmodified.

use std::future::Future;

use anyhow::Result;
use tokio::time::{sleep, Duration};
use tracing::debug;

const BACKOFF_STEP: Duration = Duration::from_millis(100);

/// Run `operation`; on failure retry up to `retries` additional times.
pub async fn execute_with_retry<T, F, Fut>(retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= retries {
                    return Err(error);
                }
                attempt += 1;
                debug!(attempt, error = %error, "attempt failed, backing off before retry");
                sleep(BACKOFF_STEP * attempt).await;
            }
        }
    }
}
