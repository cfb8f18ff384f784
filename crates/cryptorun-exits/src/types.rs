/// Exit-trigger thresholds (§4.H, §6 config defaults).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitThresholds {
    pub hard_stop_atr_k: f64,
    pub venue_p99_max_ms: f64,
    pub venue_error_rate_max: f64,
    pub venue_reject_rate_max: f64,
    pub max_hold_hours: f64,
    pub trailing_atr_m: f64,
    pub accel_reversal_min_magnitude: f64,
    pub profit_target_t1_pct: f64,
    pub profit_target_t2_pct: f64,
    pub profit_target_t3_pct: f64,
}

impl Default for ExitThresholds {
    fn default() -> Self {
        Self {
            hard_stop_atr_k: 1.5,
            venue_p99_max_ms: 2_000.0,
            venue_error_rate_max: 0.03,
            venue_reject_rate_max: 0.05,
            max_hold_hours: 48.0,
            trailing_atr_m: 1.8,
            accel_reversal_min_magnitude: 0.01,
            profit_target_t1_pct: 0.08,
            profit_target_t2_pct: 0.15,
            profit_target_t3_pct: 0.25,
        }
    }
}

/// Live market and venue-health readings an exit tick checks against an open
/// position's [`cryptorun_schemas::ExitState`] (§4.H).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitMarketInput {
    pub price: f64,
    pub atr: f64,
    pub venue_p99_ms: f64,
    pub venue_error_rate: f64,
    pub venue_reject_rate: f64,
    pub momentum_1h: f64,
    pub momentum_4h: f64,
    pub accel_4h: f64,
    pub now_ts: i64,
}
