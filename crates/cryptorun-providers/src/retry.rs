use crate::types::ProviderError;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff policy for retriable upstream failures (§4.A/§7).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub multiplier: f64,
    pub max_attempts: u32,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            multiplier: 2.0,
            max_attempts: 4,
            cap: Duration::from_secs(5),
        }
    }
}

/// Retry `op` under exponential backoff. `NonUSDSymbol`/`AggregatorBan` are
/// non-retriable and returned on the first attempt (§7). Exhaustion after
/// `max_attempts` returns the last `TransientUpstream` error unchanged.
pub async fn with_backoff<F, Fut, T>(policy: BackoffPolicy, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut delay = policy.initial;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if !e.is_retriable() => return Err(e),
            Err(e) if attempt >= policy.max_attempts => return Err(e),
            Err(_) => {
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.multiplier).min(policy.cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn non_retriable_error_fails_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let policy = BackoffPolicy {
            initial: Duration::from_millis(1),
            ..Default::default()
        };
        let result = with_backoff(policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(ProviderError::NonUSDSymbol { symbol: "X".into() }) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_error_retries_until_success() {
        let calls = AtomicU32::new(0);
        let policy = BackoffPolicy {
            initial: Duration::from_millis(1),
            ..Default::default()
        };
        let result = with_backoff(policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ProviderError::TransientUpstream {
                        venue: "binance".into(),
                        detail: "timeout".into(),
                    })
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn transient_error_exhausts_after_max_attempts() {
        let policy = BackoffPolicy {
            initial: Duration::from_millis(1),
            max_attempts: 3,
            ..Default::default()
        };
        let result: Result<(), _> = with_backoff(policy, || async {
            Err(ProviderError::TransientUpstream {
                venue: "okx".into(),
                detail: "503".into(),
            })
        })
        .await;
        assert!(matches!(result, Err(ProviderError::TransientUpstream { .. })));
    }
}
