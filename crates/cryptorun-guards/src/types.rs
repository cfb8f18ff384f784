/// Thresholds for the three entry guards (§4.G, §6 config defaults).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardThresholds {
    pub freshness_max_bars: u32,
    pub freshness_atr_factor: f64,
    pub fatigue_threshold_24h_pct: f64,
    pub latefill_base_ms: f64,
    pub latefill_p99_ms: f64,
    pub latefill_grace_ms: f64,
    pub latefill_cooldown_secs: i64,
}

impl Default for GuardThresholds {
    fn default() -> Self {
        Self {
            freshness_max_bars: 2,
            freshness_atr_factor: 1.2,
            fatigue_threshold_24h_pct: 15.0,
            latefill_base_ms: 30_000.0,
            latefill_p99_ms: 400.0,
            latefill_grace_ms: 30_000.0,
            latefill_cooldown_secs: 1_800,
        }
    }
}

/// Bar age and price distance from signal close, in ATR units of the raw
/// price distance (§4.G freshness guard).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreshnessInput {
    pub bar_age: u32,
    pub price_distance: f64,
    pub atr: f64,
}

/// 24h return and whether 4h acceleration still confirms the move
/// (§4.G fatigue guard; acceleration-confirmed moves are never fatigued).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FatigueInput {
    pub return_24h_pct: f64,
    pub acceleration_confirmed: bool,
}

/// Signal-to-execution timing and the venue's current order-latency p99
/// (§4.G late-fill guard).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LateFillInput {
    pub signal_ts: i64,
    pub exec_ts: i64,
    pub p99_order_latency_ms: f64,
}
