use crate::latency::LatencyHistogram;
use crate::rate_limit::VenueRateLimiter;
use crate::types::{
    EtfFlow, FundingRate, L1Ticker, L2Depth, OpenInterest, ProviderError, SourceKind, Stage,
    VenueHealth,
};
use crate::usd::enforce_usd_quote;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Uniform provider contract (§6 "Provider contract").
///
/// `Name`/`Start`/`Stop`/`Subscribe`/`GetL1`/`GetL2` map to the snake_case
/// methods below; funding/open-interest/ETF-flow are additional fetches
/// needed by the factor extractor (§4.A), under the adapter layer's
/// responsibility.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    fn source_kind(&self) -> SourceKind;

    async fn start(&self) -> Result<(), ProviderError>;
    async fn stop(&self) -> Result<(), ProviderError>;
    async fn subscribe(&self, symbols: &[String]) -> Result<(), ProviderError>;

    async fn get_l1(&self, symbol: &str) -> Result<L1Ticker, ProviderError>;
    async fn get_l2(&self, symbol: &str) -> Result<L2Depth, ProviderError>;
    async fn get_funding(&self, symbol: &str) -> Result<FundingRate, ProviderError>;
    async fn get_open_interest(&self, symbol: &str) -> Result<OpenInterest, ProviderError>;
    async fn get_etf_flow(&self, symbol: &str) -> Result<EtfFlow, ProviderError>;

    fn health(&self) -> VenueHealth;
}

/// Shared bookkeeping every concrete provider composes: USD enforcement,
/// aggregator-ban enforcement for microstructure, per-venue rate limiting,
/// latency sampling, and rolling error/reject counters (§4.A).
pub struct AdapterState {
    pub source: SourceKind,
    pub rate_limiter: VenueRateLimiter,
    pub latency: LatencyHistogram,
    calls: AtomicU64,
    errors: AtomicU64,
    rejects: AtomicU64,
    last_success_ms: Mutex<Option<i64>>,
}

impl AdapterState {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            rate_limiter: VenueRateLimiter::new(source.default_rps()),
            latency: LatencyHistogram::new(),
            calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            rejects: AtomicU64::new(0),
            last_success_ms: Mutex::new(None),
        }
    }

    /// Validate the symbol and, for microstructure calls, the source kind,
    /// before any network activity happens (§4.A: non-retriable checks run
    /// first; they never consume a rate-limit token or a retry attempt).
    pub fn guard_microstructure_request(&self, symbol: &str) -> Result<(), ProviderError> {
        enforce_usd_quote(symbol)?;
        if self.source.is_aggregator() {
            return Err(ProviderError::AggregatorBan {
                source: self.source.name().to_string(),
            });
        }
        Ok(())
    }

    pub fn guard_pricing_request(&self, symbol: &str) -> Result<(), ProviderError> {
        enforce_usd_quote(symbol)
    }

    /// Record the outcome of one call for latency/error/reject accounting.
    pub fn record_call(&self, stage: Stage, started_at: Instant, outcome: &Result<(), ProviderError>) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.latency.record(self.source.name(), stage, started_at.elapsed());
        match outcome {
            Ok(()) => {
                *self.last_success_ms.lock() = Some(now_ms());
            }
            Err(ProviderError::TransientUpstream { .. }) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.rejects.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn error_rate(&self) -> f64 {
        let calls = self.calls.load(Ordering::Relaxed);
        if calls == 0 {
            return 0.0;
        }
        self.errors.load(Ordering::Relaxed) as f64 / calls as f64
    }

    pub fn reject_rate(&self) -> f64 {
        let calls = self.calls.load(Ordering::Relaxed);
        if calls == 0 {
            return 0.0;
        }
        self.rejects.load(Ordering::Relaxed) as f64 / calls as f64
    }

    pub fn data_freshness_ms(&self) -> f64 {
        match *self.last_success_ms.lock() {
            Some(t) => (now_ms() - t).max(0) as f64,
            None => f64::INFINITY,
        }
    }

    pub fn health_snapshot(&self) -> VenueHealth {
        let p50 = self
            .latency
            .p50_ms(self.source.name(), Stage::Fetch)
            .unwrap_or(0.0);
        let p99 = self
            .latency
            .p99_ms(self.source.name(), Stage::Fetch)
            .unwrap_or(0.0);
        VenueHealth::derive(p50, p99, self.error_rate(), self.data_freshness_ms())
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn microstructure_guard_bans_aggregator() {
        let st = AdapterState::new(SourceKind::DexScreener);
        let err = st.guard_microstructure_request("BTC-USD");
        assert_eq!(
            err,
            Err(ProviderError::AggregatorBan {
                source: "dexscreener".to_string()
            })
        );
    }

    #[test]
    fn microstructure_guard_allows_exchange_native() {
        let st = AdapterState::new(SourceKind::Binance);
        assert!(st.guard_microstructure_request("BTC-USD").is_ok());
    }

    #[test]
    fn pricing_guard_allows_aggregator() {
        let st = AdapterState::new(SourceKind::CoinGecko);
        assert!(st.guard_pricing_request("BTC-USD").is_ok());
    }

    #[test]
    fn non_usd_symbol_rejected_regardless_of_source() {
        let st = AdapterState::new(SourceKind::Binance);
        assert!(st.guard_microstructure_request("BTC-EUR").is_err());
    }

    #[test]
    fn error_rate_zero_with_no_calls() {
        let st = AdapterState::new(SourceKind::Binance);
        assert_eq!(st.error_rate(), 0.0);
    }

    #[test]
    fn fresh_data_before_any_success_is_infinite() {
        let st = AdapterState::new(SourceKind::Binance);
        assert!(st.data_freshness_ms().is_infinite());
    }
}
