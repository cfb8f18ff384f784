use serde::{Deserialize, Serialize};

/// Exchange-native venues eligible to serve microstructure (§4.A).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Binance,
    Okx,
    Coinbase,
    Kraken,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Okx => "okx",
            Venue::Coinbase => "coinbase",
            Venue::Kraken => "kraken",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-venue microstructure metrics (§4.B).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueMicro {
    pub venue: Venue,
    pub spread_bps: f64,
    pub mid_price: f64,
    pub depth_usd: f64,
    pub vadr: f64,
    pub liquidity_gradient: f64,
    pub data_age_secs: f64,
    pub passed: bool,
}

/// Consensus microstructure result for one symbol across venues (§3/§4.B).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicrostructureResult {
    pub spread_bps: f64,
    pub depth_usd: f64,
    pub vadr: f64,
    pub liquidity_gradient: f64,
    pub venues_used: Vec<Venue>,
    pub passed: bool,
    pub reason: String,
}

/// Thresholds used by the microstructure evaluator (§4.B, §6 config).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicroThresholds {
    pub spread_bps_max: f64,
    pub depth_usd_min: f64,
    pub vadr_min: f64,
    pub stale_after_secs: f64,
    pub consensus_min_venues: usize,
    /// Cross-venue spread-direction agreement band (§3: "within 50 bps").
    pub consensus_band_bps: f64,
}

impl Default for MicroThresholds {
    fn default() -> Self {
        Self {
            spread_bps_max: 50.0,
            depth_usd_min: 100_000.0,
            vadr_min: 1.8,
            stale_after_secs: 5.0,
            consensus_min_venues: 2,
            consensus_band_bps: 50.0,
        }
    }
}
