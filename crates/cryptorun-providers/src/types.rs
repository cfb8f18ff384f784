use cryptorun_schemas::Venue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sources an adapter may be tagged with (§4.A).
///
/// Exchange-native sources may serve microstructure; aggregator sources are
/// permitted for pricing/volume/events only and must fail any microstructure
/// request with `AggregatorBan`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Binance,
    Okx,
    Coinbase,
    Kraken,
    CoinGecko,
    CoinPaprika,
    DexScreener,
    DefiLlama,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Binance => "binance",
            SourceKind::Okx => "okx",
            SourceKind::Coinbase => "coinbase",
            SourceKind::Kraken => "kraken",
            SourceKind::CoinGecko => "coingecko",
            SourceKind::CoinPaprika => "coinpaprika",
            SourceKind::DexScreener => "dexscreener",
            SourceKind::DefiLlama => "defillama",
        }
    }

    pub fn is_aggregator(&self) -> bool {
        matches!(
            self,
            SourceKind::CoinGecko
                | SourceKind::CoinPaprika
                | SourceKind::DexScreener
                | SourceKind::DefiLlama
        )
    }

    /// Documented free-tier requests-per-second floor used to seed the
    /// per-venue rate limiter (§4.A). Aggregators default conservatively.
    pub fn default_rps(&self) -> f64 {
        match self {
            SourceKind::Binance => 10.0,
            SourceKind::Okx => 8.0,
            SourceKind::Coinbase => 5.0,
            // Kraken's documented free tier floors near 1 RPS (§4.A).
            SourceKind::Kraken => 1.0,
            SourceKind::CoinGecko => 1.0,
            SourceKind::CoinPaprika => 1.0,
            SourceKind::DexScreener => 1.0,
            SourceKind::DefiLlama => 1.0,
        }
    }

    /// The microstructure `Venue` this source speaks for, if any. Aggregators
    /// have none — they never clear `is_aggregator()` checks upstream of this
    /// call, but the mapping is total for convenience at call sites.
    pub fn as_venue(&self) -> Option<Venue> {
        match self {
            SourceKind::Binance => Some(Venue::Binance),
            SourceKind::Okx => Some(Venue::Okx),
            SourceKind::Coinbase => Some(Venue::Coinbase),
            SourceKind::Kraken => Some(Venue::Kraken),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fixed latency-histogram stage enumeration (§6 Guards/adapters contract).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Order,
    Fetch,
    Score,
}

/// L1 top-of-book ticker snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct L1Ticker {
    pub bid: f64,
    pub ask: f64,
    pub bid_size: f64,
    pub ask_size: f64,
    /// Epoch millis this snapshot was captured.
    pub ts_ms: i64,
}

impl L1Ticker {
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

/// One price level of an L2 depth snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: f64,
    pub size: f64,
}

/// L2 depth snapshot (both sides), plus the timestamp it was captured at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct L2Depth {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
    pub ts_ms: i64,
}

/// Funding-rate snapshot used by the factor extractor's divergence check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundingRate {
    pub rate: f64,
    pub predicted_rate: f64,
    pub ts_ms: i64,
}

impl FundingRate {
    /// `true` when the live rate diverges materially from the predicted
    /// rate, feeding the entry gate's `funding_divergence` check (§4.F).
    pub fn diverges(&self, threshold: f64) -> bool {
        (self.rate - self.predicted_rate).abs() >= threshold
    }
}

/// Open-interest snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenInterest {
    pub oi_usd: f64,
    pub ts_ms: i64,
}

/// ETF net-flow snapshot (pricing/volume/events tier — aggregator-eligible).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EtfFlow {
    pub net_flow_usd: f64,
    pub ts_ms: i64,
}

/// Venue health status bucket (§6 Provider contract).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

/// Recommended posture at the current health status (§6).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Proceed,
    HalveSize,
    Avoid,
}

/// Venue health snapshot (§6 Provider contract), computed from the rolling
/// latency histogram and error/reject counters (§4.A).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueHealth {
    pub status: HealthStatus,
    pub p50_ms: f64,
    pub p99_ms: f64,
    pub error_rate: f64,
    pub data_freshness_ms: f64,
    pub recommendation: Recommendation,
}

impl VenueHealth {
    /// Derive status/recommendation deterministically from the raw signals
    /// (§2: the snapshot shape without a specified derivation; DESIGN.md
    /// records the thresholds chosen here).
    pub fn derive(p50_ms: f64, p99_ms: f64, error_rate: f64, data_freshness_ms: f64) -> Self {
        let status = if p99_ms > 2000.0 || error_rate > 0.05 {
            HealthStatus::Red
        } else if p99_ms > 800.0 || error_rate > 0.02 {
            HealthStatus::Yellow
        } else {
            HealthStatus::Green
        };
        let recommendation = match status {
            HealthStatus::Green => Recommendation::Proceed,
            HealthStatus::Yellow => Recommendation::HalveSize,
            HealthStatus::Red => Recommendation::Avoid,
        };
        Self {
            status,
            p50_ms,
            p99_ms,
            error_rate,
            data_freshness_ms,
            recommendation,
        }
    }
}

/// Fallible-boundary error taxonomy for the provider adapter layer (§7).
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderError {
    /// Non-retriable: symbol is not USD-quoted (or a recognized USDT proxy).
    NonUSDSymbol { symbol: String },
    /// Non-retriable: microstructure requested from an aggregator source.
    AggregatorBan { source: String },
    /// Retriable exhausted: network/5xx/decode failures after backoff cap.
    TransientUpstream { venue: String, detail: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NonUSDSymbol { symbol } => write!(f, "non-USD symbol: {symbol}"),
            ProviderError::AggregatorBan { source } => {
                write!(f, "aggregator '{source}' cannot serve microstructure")
            }
            ProviderError::TransientUpstream { venue, detail } => {
                write!(f, "transient upstream failure at {venue}: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Whether retrying this error class could ever succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ProviderError::TransientUpstream { .. })
    }
}
