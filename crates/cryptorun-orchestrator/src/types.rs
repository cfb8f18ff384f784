use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cryptorun_gates::GateThresholds;
use cryptorun_guards::GuardThresholds;
use cryptorun_schemas::{CoreError, FactorAttribution, GuardResult, MicroThresholds, MicrostructureResult};

/// Per-window scan configuration (§4.I, §6 recognized options).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowConfig {
    /// Max candidates admitted per window (§6 `top_n`, default 30).
    pub top_n: usize,
    /// Worker pool size bounding per-candidate concurrency in both the fetch
    /// phase and the post-barrier score/gate/guard/micro phase (§5, default
    /// `min(CPU, 8)`).
    pub worker_pool_size: usize,
    /// Scoped deadline each candidate's fetch must complete within,
    /// derived from the window stride (§4.I step 4).
    pub fetch_deadline: Duration,
    pub gate_thresholds: GateThresholds,
    pub guard_thresholds: GuardThresholds,
    pub micro_thresholds: MicroThresholds,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            top_n: 30,
            worker_pool_size: std::thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4),
            fetch_deadline: Duration::from_secs(10),
            gate_thresholds: GateThresholds::default(),
            guard_thresholds: GuardThresholds::default(),
            micro_thresholds: MicroThresholds::default(),
        }
    }
}

/// Per-candidate decision emitted into `results.jsonl` (§6).
///
/// `pnl`/`pnl_error` are simulated-hold fields populated only by a backtest
/// driver's per-tick hook (out of scope per §1) — a live scan always leaves
/// them `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub symbol: String,
    pub scan_ts: i64,
    pub score: Option<f64>,
    pub passed: bool,
    pub fail_reason: Option<String>,
    pub guard_result: Option<GuardResult>,
    pub micro_result: Option<MicrostructureResult>,
    pub attribution: Vec<FactorAttribution>,
    pub pnl_pct: Option<f64>,
    pub pnl_error: Option<String>,
}

impl CandidateResult {
    pub fn skip(symbol: impl Into<String>, scan_ts: i64, reason: CoreError) -> Self {
        Self {
            symbol: symbol.into(),
            scan_ts,
            score: None,
            passed: false,
            fail_reason: Some(reason.to_string()),
            guard_result: None,
            micro_result: None,
            attribution: Vec::new(),
            pnl_pct: None,
            pnl_error: None,
        }
    }
}

/// Aggregate counters over one window's candidate results (§4.I step 5).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub total: usize,
    pub passed: usize,
    /// Candidates that never reached scoring — fetch failed, timed out, or
    /// hit a non-retriable provider error (non-USD symbol, aggregator ban).
    pub skipped: usize,
    /// Candidates that were fully evaluated but blocked by microstructure,
    /// an entry gate, or a guard.
    pub denied: usize,
    pub freshness_denials: usize,
    pub fatigue_denials: usize,
    pub late_fill_denials: usize,
    pub relax_events: usize,
    /// Candidates whose fetch failed via `TransientUpstream` — the closest
    /// window-level proxy to "throttle events" the orchestrator can observe
    /// without reaching into each provider's rate limiter directly
    /// (DESIGN.md).
    pub throttle_events: usize,
    /// Count of fetch-stage skips by taxonomy discriminant name, for a
    /// compact error-attribution view without enumerating every `CoreError`
    /// variant here.
    pub skip_reasons: BTreeMap<String, usize>,
}

/// Full output of one scan window (§4.I / §6).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    pub candidates: Vec<CandidateResult>,
    pub summary: WindowSummary,
}
