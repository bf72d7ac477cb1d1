//! Transient-failure retry for store operations.

use std::future::Future;
use std::time::Duration;

use jive_domain::constants::{STORE_RETRY_BASE_DELAY_MS, STORE_RETRY_MAX_ATTEMPTS};
use jive_domain::error::Result;

/// Run `run`, retrying transient store/I-O failures with exponential backoff.
///
/// Validation and state errors pass through untouched; only errors marked
/// retryable are attempted again, up to the configured attempt cap.
pub(crate) async fn with_retry<T, F, Fut>(operation: &'static str, mut run: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < STORE_RETRY_MAX_ATTEMPTS => {
                attempt += 1;
                let delay = Duration::from_millis(STORE_RETRY_BASE_DELAY_MS << (attempt - 1));
                tracing::warn!(operation, attempt, error = %err, "retrying transient store failure");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jive_domain::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::store("transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_validation_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::validation("bad input")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::store("still broken")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
