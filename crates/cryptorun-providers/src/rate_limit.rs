use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;

type Limiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Per-venue token bucket at the venue's documented free-tier RPS (§4.A).
///
/// `fetch` on a provider suspends on this until a token is available or the
/// caller's context is cancelled.
pub struct VenueRateLimiter {
    limiter: Limiter,
}

impl VenueRateLimiter {
    /// `rps` is clamped to at least 1 request/sec — a zero quota would wedge
    /// the adapter forever, which is never the intent of a rate-limit config.
    pub fn new(rps: f64) -> Self {
        let per_sec = (rps.max(1.0).round() as u32).max(1);
        let quota = NonZeroU32::new(per_sec).unwrap_or(nonzero!(1u32));
        Self {
            limiter: RateLimiter::direct(Quota::per_second(quota)),
        }
    }

    /// Block until a token is available, or until `deadline` elapses,
    /// whichever comes first. Returns `false` on deadline expiry.
    pub async fn acquire(&self, deadline: tokio::time::Instant) -> bool {
        loop {
            match self.limiter.check() {
                Ok(()) => return true,
                Err(_not_until) => {
                    if tokio::time::Instant::now() >= deadline {
                        return false;
                    }
                    let sleep_for = std::time::Duration::from_millis(5);
                    let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
                    tokio::time::sleep(sleep_for.min(remaining)).await;
                    if remaining.is_zero() {
                        return false;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_token_is_immediate() {
        let rl = VenueRateLimiter::new(10.0);
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
        assert!(rl.acquire(deadline).await);
    }

    #[tokio::test]
    async fn exhausted_bucket_eventually_refills() {
        let rl = VenueRateLimiter::new(1000.0);
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_millis(200);
        for _ in 0..5 {
            assert!(rl.acquire(deadline).await);
        }
    }

    #[tokio::test]
    async fn deadline_expiry_returns_false() {
        let rl = VenueRateLimiter::new(1.0);
        // Drain the single token.
        let far = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
        assert!(rl.acquire(far).await);
        // Immediately expired deadline with the bucket empty.
        let expired = tokio::time::Instant::now();
        assert!(!rl.acquire(expired).await);
    }
}
