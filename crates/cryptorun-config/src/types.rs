use cryptorun_schemas::{Regime, RegimeWeights, Venue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recognized top-level configuration (§6).
///
/// Every field has the documented default; `CryptoRunConfig::default()`
/// reproduces the §6 recognized-options table exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoRunConfig {
    pub top_n: usize,
    pub stride_secs: i64,
    pub hold_secs: i64,
    pub horizon_secs: i64,

    pub score_threshold: f64,
    pub vadr_min: f64,
    pub spread_bps_max: f64,
    pub depth_usd_min: f64,

    pub guard_freshness_max_bars: u32,
    pub guard_freshness_atr_factor: f64,

    pub guard_fatigue_threshold_24h_pct: f64,

    pub guard_latefill_base_ms: f64,
    pub guard_latefill_p99_ms: f64,
    pub guard_latefill_grace_ms: f64,
    pub guard_latefill_cooldown_secs: i64,

    pub exit_hard_stop_atr: f64,
    pub exit_trailing_atr: f64,
    pub exit_max_hold_secs: i64,

    pub microstructure_venues: Vec<Venue>,

    pub regime_weights: BTreeMap<Regime, RegimeWeights>,

    pub worker_pool_size: usize,
}

impl Default for CryptoRunConfig {
    fn default() -> Self {
        Self {
            top_n: 30,
            stride_secs: 4 * 3600,
            hold_secs: 48 * 3600,
            horizon_secs: 90 * 24 * 3600,

            score_threshold: 75.0,
            vadr_min: 1.8,
            spread_bps_max: 50.0,
            depth_usd_min: 100_000.0,

            guard_freshness_max_bars: 2,
            guard_freshness_atr_factor: 1.2,

            guard_fatigue_threshold_24h_pct: 15.0,

            guard_latefill_base_ms: 30_000.0,
            guard_latefill_p99_ms: 400.0,
            guard_latefill_grace_ms: 30_000.0,
            guard_latefill_cooldown_secs: 30 * 60,

            exit_hard_stop_atr: 1.5,
            exit_trailing_atr: 1.8,
            exit_max_hold_secs: 48 * 3600,

            microstructure_venues: vec![Venue::Binance, Venue::Okx, Venue::Coinbase, Venue::Kraken],

            regime_weights: default_regime_weights(),

            worker_pool_size: default_worker_pool_size(),
        }
    }
}

fn default_worker_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(4)
}

/// Conservative built-in defaults for all seven regimes (§3). Each row sums to
/// 1.0. Operators are expected to override these via `regime_weights` in
/// layered config for a tuned deployment; these exist so the system is usable
/// (and testable) out of the box.
fn default_regime_weights() -> BTreeMap<Regime, RegimeWeights> {
    let mut m = BTreeMap::new();
    m.insert(
        Regime::Calm,
        RegimeWeights {
            momentum_core: 0.35,
            technical_resid: 0.25,
            supply_demand_block: 0.25,
            catalyst_block: 0.15,
        },
    );
    m.insert(
        Regime::Normal,
        RegimeWeights {
            momentum_core: 0.40,
            technical_resid: 0.20,
            supply_demand_block: 0.25,
            catalyst_block: 0.15,
        },
    );
    m.insert(
        Regime::Volatile,
        RegimeWeights {
            momentum_core: 0.30,
            technical_resid: 0.20,
            supply_demand_block: 0.30,
            catalyst_block: 0.20,
        },
    );
    m.insert(
        Regime::Choppy,
        RegimeWeights {
            momentum_core: 0.20,
            technical_resid: 0.30,
            supply_demand_block: 0.35,
            catalyst_block: 0.15,
        },
    );
    m.insert(
        Regime::Bull,
        RegimeWeights {
            momentum_core: 0.50,
            technical_resid: 0.15,
            supply_demand_block: 0.20,
            catalyst_block: 0.15,
        },
    );
    m.insert(
        Regime::Bear,
        RegimeWeights {
            momentum_core: 0.30,
            technical_resid: 0.25,
            supply_demand_block: 0.30,
            catalyst_block: 0.15,
        },
    );
    m.insert(
        Regime::HighVol,
        RegimeWeights {
            momentum_core: 0.25,
            technical_resid: 0.20,
            supply_demand_block: 0.35,
            catalyst_block: 0.20,
        },
    );
    m
}
