//! Provider adapter layer: exchange-native/aggregator source typing, USD-quote
//! enforcement, per-venue rate limiting, latency sampling, retry, and the
//! uniform `Provider` trait contract consumed by the microstructure
//! evaluator and factor extractor.

pub mod latency;
pub mod provider;
pub mod rate_limit;
pub mod retry;
pub mod types;
pub mod usd;

pub use latency::LatencyHistogram;
pub use provider::{AdapterState, Provider};
pub use rate_limit::VenueRateLimiter;
pub use retry::{with_backoff, BackoffPolicy};
pub use types::{
    DepthLevel, EtfFlow, FundingRate, HealthStatus, L1Ticker, L2Depth, OpenInterest,
    ProviderError, Recommendation, SourceKind, Stage, VenueHealth,
};
pub use usd::enforce_usd_quote;
