use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const FETCH_RETRIES: usize = 3;
pub const FETCH_RETRY_DELAY_MS: u64 = 500;

/// Retries a request until it succeeds or `retries` extra attempts have
/// failed, sleeping `delay_ms` between attempts. Only transport errors are
/// retried; an HTTP error status is a successful response here.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt > retries => return Err(err.into()),
            Err(err) => {
                debug!(attempt, retries, error = %err, "Feed request failed, retrying");
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
