use std::sync::Arc;

use cryptorun_gates::{evaluate_gates, GateInput};
use cryptorun_guards::RelaxMap;
use cryptorun_micro::{evaluate_consensus, evaluate_venue};
use cryptorun_orthogonal::{orthogonalize, verify_batch_invariants, MIN_CORRELATION_BATCH};
use cryptorun_regime::{score_candidate, RegimeWeightsTable};
use cryptorun_schemas::{Candidate, CoreError, OrthogonalFactors, Regime};

use crate::source::{CandidateDataSource, CandidateSnapshot};
use crate::types::{CandidateResult, WindowConfig, WindowResult, WindowSummary};

/// Drives one scan window end to end (§4.I / §5).
///
/// Holds the long-lived state a scan window must carry across candidates:
/// the validated regime weight table and the process-wide late-fill relax
/// map, so that relax idempotence (§4.G) holds across the whole window's
/// lifetime, not just within one candidate's evaluation.
pub struct ScanEngine {
    config: WindowConfig,
    weights: Arc<RegimeWeightsTable>,
    relax_map: Arc<RelaxMap>,
}

impl ScanEngine {
    pub fn new(config: WindowConfig, weights: RegimeWeightsTable) -> Self {
        Self {
            config,
            weights: Arc::new(weights),
            relax_map: Arc::new(RelaxMap::new()),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Runs one window: admits up to `top_n` candidates, fetches their
    /// snapshots concurrently, orthogonalizes the whole batch at once behind
    /// a single barrier, then scores/gates/guards each survivor (§4.I steps
    /// 2-5).
    ///
    /// The component order after the barrier is microstructure, then score,
    /// then gates, then guards: the entry gate's VADR check (§4.F) needs the
    /// consensus VADR the microstructure evaluator (§4.B) produces, so
    /// microstructure must run before gates even though §2's table lists
    /// gates ahead of microstructure (DESIGN.md).
    ///
    /// Returns `Err` only for a fatal batch-level invariant violation (§7);
    /// every other per-candidate failure is folded into that candidate's
    /// `CandidateResult` and the window completes normally.
    pub async fn run_window(
        &self,
        candidates: Vec<Candidate>,
        source: Arc<dyn CandidateDataSource>,
    ) -> Result<WindowResult, CoreError> {
        let admitted: Vec<Candidate> = candidates.into_iter().take(self.config.top_n).collect();
        if admitted.is_empty() {
            return Ok(WindowResult::default());
        }

        let pool_size = self.config.worker_pool_size.max(1);
        let semaphore = Arc::new(tokio::sync::Semaphore::new(pool_size));
        let deadline = self.config.fetch_deadline;

        let mut fetch_handles = Vec::with_capacity(admitted.len());
        for candidate in admitted {
            let source = Arc::clone(&source);
            let semaphore = Arc::clone(&semaphore);
            fetch_handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed during a window run");
                let outcome = match tokio::time::timeout(deadline, source.fetch_snapshot(&candidate)).await {
                    Ok(result) => result,
                    Err(_) => Err(CoreError::Cancelled {
                        reason: format!("fetch deadline exceeded for {}", candidate.symbol),
                    }),
                };
                (candidate, outcome)
            }));
        }

        let mut ok_rows: Vec<(Candidate, CandidateSnapshot)> = Vec::new();
        let mut results: Vec<CandidateResult> = Vec::new();
        let mut summary = WindowSummary::default();

        for handle in fetch_handles {
            let (candidate, outcome) = handle.await.map_err(|e| CoreError::Cancelled {
                reason: format!("fetch task did not complete: {e}"),
            })?;
            summary.total += 1;
            match outcome {
                Ok(snapshot) => ok_rows.push((candidate, snapshot)),
                Err(err) => {
                    record_skip(&mut summary, &err);
                    results.push(CandidateResult::skip(candidate.symbol, candidate.scan_ts, err));
                }
            }
        }

        let raw_panel: Vec<_> = ok_rows.iter().map(|(_, snap)| snap.factors.raw).collect();
        let orth_panel = orthogonalize(&raw_panel);
        if raw_panel.len() >= MIN_CORRELATION_BATCH {
            verify_batch_invariants(&raw_panel, &orth_panel)?;
        }

        let mut score_handles = Vec::with_capacity(ok_rows.len());
        for ((candidate, snapshot), orth) in ok_rows.into_iter().zip(orth_panel.into_iter()) {
            let weights = Arc::clone(&self.weights);
            let relax_map = Arc::clone(&self.relax_map);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config;
            score_handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed during a window run");
                evaluate_one(&config, &weights, &relax_map, candidate, snapshot, orth)
            }));
        }

        for handle in score_handles {
            let result = handle.await.map_err(|e| CoreError::Cancelled {
                reason: format!("score task did not complete: {e}"),
            })?;
            record_result_summary(&mut summary, &result);
            results.push(result);
        }

        results.sort_by(order_candidates);

        Ok(WindowResult {
            candidates: results,
            summary,
        })
    }
}

/// Score-descending, symbol-ascending tie-break (§4.I step 5 / §8). Skipped
/// candidates carry no score and sort after every scored one, ordered among
/// themselves by symbol.
fn order_candidates(a: &CandidateResult, b: &CandidateResult) -> std::cmp::Ordering {
    match (a.score, b.score) {
        (Some(sa), Some(sb)) => sb
            .partial_cmp(&sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    }
}

fn evaluate_one(
    config: &WindowConfig,
    weights: &RegimeWeightsTable,
    relax_map: &RelaxMap,
    candidate: Candidate,
    snapshot: CandidateSnapshot,
    orth: OrthogonalFactors,
) -> CandidateResult {
    let regime = match Regime::parse(&candidate.regime_tag) {
        Some(regime) => regime,
        None => {
            return CandidateResult::skip(
                candidate.symbol,
                candidate.scan_ts,
                CoreError::InvariantViolation {
                    detail: format!("unrecognized regime tag '{}'", candidate.regime_tag),
                },
            );
        }
    };

    let venue_verdicts: Vec<_> = snapshot
        .venues
        .iter()
        .map(|snap| evaluate_venue(&config.micro_thresholds, snap))
        .collect();
    let micro = match evaluate_consensus(&config.micro_thresholds, &candidate.symbol, &venue_verdicts) {
        Ok(micro) => micro,
        Err(err) => {
            let reason = err.to_string();
            return CandidateResult {
                symbol: candidate.symbol,
                scan_ts: candidate.scan_ts,
                score: None,
                passed: false,
                fail_reason: Some(reason),
                guard_result: None,
                micro_result: None,
                attribution: Vec::new(),
                pnl_pct: None,
                pnl_error: None,
            };
        }
    };

    let regime_weights = weights.get(regime);
    let (score, attribution) = score_candidate(
        &regime_weights,
        &snapshot.factors.raw,
        &orth,
        snapshot.factors.catalyst_score,
    );

    let gate_input = GateInput {
        final_with_social: score.final_with_social,
        vadr: micro.vadr,
        funding_divergence: snapshot.factors.funding_divergence,
    };
    let gate_result = evaluate_gates(&config.gate_thresholds, &gate_input);
    if !gate_result.passed {
        let blocking = gate_result.blocking_gate.expect("blocked result always names a gate");
        let measured = gate_result.measured_value.unwrap_or_default();
        return CandidateResult {
            symbol: candidate.symbol,
            scan_ts: candidate.scan_ts,
            score: Some(score.final_with_social),
            passed: false,
            fail_reason: Some(format!("gate '{blocking}' blocked (measured {measured:.4})")),
            guard_result: None,
            micro_result: Some(micro),
            attribution,
            pnl_pct: None,
            pnl_error: None,
        };
    }

    let guard_result = relax_map.evaluate(
        &config.guard_thresholds,
        &candidate.symbol,
        &snapshot.freshness,
        &snapshot.fatigue,
        &snapshot.late_fill,
    );
    let passed = guard_result.passed();
    let fail_reason = if passed {
        None
    } else {
        Some(first_guard_failure_reason(&guard_result))
    };

    CandidateResult {
        symbol: candidate.symbol,
        scan_ts: candidate.scan_ts,
        score: Some(score.final_with_social),
        passed,
        fail_reason,
        guard_result: Some(guard_result),
        micro_result: Some(micro),
        attribution,
        pnl_pct: None,
        pnl_error: None,
    }
}

/// Guards run in fixed order, so the first denial is the one worth
/// reporting (§4.G: freshness, then fatigue, then late-fill).
fn first_guard_failure_reason(result: &cryptorun_schemas::GuardResult) -> String {
    if !result.freshness.allowed {
        return format!("freshness: {}", result.freshness.reason);
    }
    if !result.fatigue.allowed {
        return format!("fatigue: {}", result.fatigue.reason);
    }
    format!("late_fill: {}", result.late_fill.reason)
}

fn record_skip(summary: &mut WindowSummary, err: &CoreError) {
    summary.skipped += 1;
    *summary.skip_reasons.entry(skip_reason_key(err).to_string()).or_insert(0) += 1;
    if matches!(err, CoreError::TransientUpstream { .. }) {
        summary.throttle_events += 1;
    }
}

fn skip_reason_key(err: &CoreError) -> &'static str {
    match err {
        CoreError::NonUSDSymbol { .. } => "non_usd_symbol",
        CoreError::AggregatorBan { .. } => "aggregator_ban",
        CoreError::TransientUpstream { .. } => "transient_upstream",
        CoreError::StaleMicro { .. } => "stale_micro",
        CoreError::InsufficientLiquidity { .. } => "insufficient_liquidity",
        CoreError::GuardDenied { .. } => "guard_denied",
        CoreError::InvariantViolation { .. } => "invariant_violation",
        CoreError::Cancelled { .. } => "cancelled",
    }
}

fn record_result_summary(summary: &mut WindowSummary, result: &CandidateResult) {
    if result.passed {
        summary.passed += 1;
    } else {
        summary.denied += 1;
    }
    if let Some(guard_result) = &result.guard_result {
        if !guard_result.freshness.allowed {
            summary.freshness_denials += 1;
        }
        if !guard_result.fatigue.allowed {
            summary.fatigue_denials += 1;
        }
        if !guard_result.late_fill.allowed {
            summary.late_fill_denials += 1;
        }
        if guard_result.late_fill.relax_used {
            summary.relax_events += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(symbol: &str, score: Option<f64>) -> CandidateResult {
        CandidateResult {
            symbol: symbol.to_string(),
            scan_ts: 0,
            score,
            passed: score.is_some(),
            fail_reason: None,
            guard_result: None,
            micro_result: None,
            attribution: Vec::new(),
            pnl_pct: None,
            pnl_error: None,
        }
    }

    #[test]
    fn orders_by_score_descending() {
        let mut rows = vec![result("AAA", Some(10.0)), result("BBB", Some(90.0))];
        rows.sort_by(order_candidates);
        assert_eq!(rows[0].symbol, "BBB");
        assert_eq!(rows[1].symbol, "AAA");
    }

    #[test]
    fn ties_break_by_symbol_ascending() {
        let mut rows = vec![result("ZZZ", Some(50.0)), result("AAA", Some(50.0))];
        rows.sort_by(order_candidates);
        assert_eq!(rows[0].symbol, "AAA");
        assert_eq!(rows[1].symbol, "ZZZ");
    }

    #[test]
    fn skipped_candidates_sort_after_scored_ones() {
        let mut rows = vec![result("NOSCORE", None), result("SCORED", Some(1.0))];
        rows.sort_by(order_candidates);
        assert_eq!(rows[0].symbol, "SCORED");
        assert_eq!(rows[1].symbol, "NOSCORE");
    }
}
