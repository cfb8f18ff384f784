use serde::{Deserialize, Serialize};

/// Open-position state tracked across exit evaluations (§3).
///
/// HWM (`high_water_mark`) is monotonically non-decreasing; callers must
/// update it before evaluating exits (§4.H).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitState {
    pub entry_price: f64,
    pub entry_time: i64,
    pub high_water_mark: f64,
    pub entry_momentum: f64,
    pub entry_accel: f64,
    pub trailing_multiplier_atr: f64,
    pub profit_targets_hit: ProfitTargetsHit,
}

/// Which profit targets (T1/T2/T3, §4.H) have already fired, so re-evaluation
/// doesn't re-trigger a lower target after a higher one has been reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitTargetsHit {
    pub t1: bool,
    pub t2: bool,
    pub t3: bool,
}

impl ExitState {
    pub fn new(entry_price: f64, entry_time: i64, entry_momentum: f64, entry_accel: f64) -> Self {
        Self {
            entry_price,
            entry_time,
            high_water_mark: entry_price,
            entry_momentum,
            entry_accel,
            trailing_multiplier_atr: 1.8,
            profit_targets_hit: ProfitTargetsHit::default(),
        }
    }

    /// Update HWM in place; must be called before exit evaluation (§4.H).
    pub fn update_hwm(&mut self, price: f64) {
        if price > self.high_water_mark {
            self.high_water_mark = price;
        }
    }
}

/// First-trigger-wins precedence order (§4.H), highest priority first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    HardStop,
    VenueHealthCut,
    TimeLimit,
    AccelerationReversal,
    MomentumFade,
    TrailingStop,
    ProfitTarget,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::HardStop => "hard_stop",
            ExitReason::VenueHealthCut => "venue_health_cut",
            ExitReason::TimeLimit => "time_limit",
            ExitReason::AccelerationReversal => "acceleration_reversal",
            ExitReason::MomentumFade => "momentum_fade",
            ExitReason::TrailingStop => "trailing_stop",
            ExitReason::ProfitTarget => "profit_target",
        }
    }
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one exit evaluation tick (§4.H).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitDecision {
    pub should_exit: bool,
    pub exit_reason: Option<ExitReason>,
    pub trigger_description: String,
    pub unrealized_pnl_pct: f64,
    pub hours_held: f64,
}
