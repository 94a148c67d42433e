//! Bounded exponential backoff for eventually-consistent IAM calls.

use std::future::Future;

use tracing::{debug, warn};

use crate::{Cancellation, Error, RetryConfig};

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// Retryable errors are those for which [`Error::is_retryable`] holds:
/// `NoSuchEntity` and service failures. Between attempts the engine sleeps
/// for [`RetryConfig::delay_for_attempt`]. Both the sleep and the in-flight
/// attempt are abandoned as soon as `cancel` fires, in which case the
/// cancellation's own error is returned.
///
/// ## Example
///
/// ```rust,no_run
/// use seaweedfs_provider::{Cancellation, Client, RetryConfig, retry_eventually_consistent};
///
/// # async fn example(client: Client) -> Result<(), seaweedfs_provider::Error> {
/// let key = retry_eventually_consistent(&Cancellation::never(), &RetryConfig::default(), || {
///     client.create_access_key("alice")
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_eventually_consistent<T, F, Fut>(
    cancel: &Cancellation,
    config: &RetryConfig,
    mut op: F,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let attempts = config.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let err = match cancel.run(op()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }

        if attempt >= attempts {
            warn!(
                attempts,
                code = err.code().unwrap_or_default(),
                "giving up on eventually-consistent IAM call"
            );
            return Err(err);
        }

        let delay = config.delay_for_attempt(attempt);
        debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            code = err.code().unwrap_or_default(),
            "retrying eventually-consistent IAM call"
        );
        cancel.sleep(delay).await?;
    }
}
