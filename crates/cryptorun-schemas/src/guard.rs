use serde::{Deserialize, Serialize};

/// Per-guard allow/deny outcome (§3/§4.G). Each of the three guards
/// (freshness, fatigue, late_fill) produces one of these; the pipeline-level
/// result is the first denial, or all-three-pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuardDecision {
    pub allowed: bool,
    pub reason: String,
    pub relax_used: bool,
    pub relax_reason: Option<String>,
    pub delay_ms: Option<f64>,
    pub next_relax_time: Option<i64>,
}

impl GuardDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
            relax_used: false,
            relax_reason: None,
            delay_ms: None,
            next_relax_time: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
            relax_used: false,
            relax_reason: None,
            delay_ms: None,
            next_relax_time: None,
        }
    }
}

/// Combined guard result for one candidate (§6 artifact field
/// `guard_result{freshness,fatigue,late_fill}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuardResult {
    pub freshness: GuardDecision,
    pub fatigue: GuardDecision,
    pub late_fill: GuardDecision,
}

impl GuardResult {
    /// `true` only if all three guards allowed.
    pub fn passed(&self) -> bool {
        self.freshness.allowed && self.fatigue.allowed && self.late_fill.allowed
    }
}

/// Per-symbol late-fill relaxation bookkeeping (§3).
///
/// A relaxation is consumable at most once per `cooldown` window per symbol;
/// the map of these is the single process-wide mutable state guards own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LateFillRelaxState {
    pub last_relax_at: Option<i64>,
}
