use crate::{BlockingGate, GateInput, GateResult, GateThresholds};

/// Evaluate the three hard entry gates in fixed order — score, VADR, funding
/// divergence — short-circuiting on the first failure (§4.F). Each gate is
/// non-retriable: a denial is final for this candidate at this scan tick.
pub fn evaluate_gates(thresholds: &GateThresholds, input: &GateInput) -> GateResult {
    if input.final_with_social < thresholds.score_min {
        return GateResult::block(BlockingGate::Score, input.final_with_social);
    }
    if input.vadr < thresholds.vadr_min {
        return GateResult::block(BlockingGate::Vadr, input.vadr);
    }
    if !input.funding_divergence {
        return GateResult::block(BlockingGate::FundingDivergence, 0.0);
    }
    GateResult::pass()
}
