use cryptorun_schemas::{GuardDecision, GuardResult, LateFillRelaxState};

use crate::{FatigueInput, FreshnessInput, GuardThresholds, LateFillInput};

/// Bar age and price-distance-from-ATR checks, evaluated first (§4.G). This
/// guard never relaxes: a stale or overextended signal is denied outright.
pub fn evaluate_freshness(cfg: &GuardThresholds, input: &FreshnessInput) -> GuardDecision {
    if input.bar_age > cfg.freshness_max_bars {
        return GuardDecision::deny(format!(
            "bar_age {} exceeds max {} bars",
            input.bar_age, cfg.freshness_max_bars
        ));
    }
    let max_distance = cfg.freshness_atr_factor * input.atr;
    if input.price_distance > max_distance {
        return GuardDecision::deny(format!(
            "price_distance {:.6} exceeds {:.1}x ATR ({:.6})",
            input.price_distance, cfg.freshness_atr_factor, max_distance
        ));
    }
    GuardDecision::allow("bar age and price distance within bounds")
}

/// 24h-return fatigue check, evaluated second (§4.G). A move confirmed by
/// current 4h acceleration is exempt — it is still impulsing, not chasing.
pub fn evaluate_fatigue(cfg: &GuardThresholds, input: &FatigueInput) -> GuardDecision {
    if input.return_24h_pct > cfg.fatigue_threshold_24h_pct && !input.acceleration_confirmed {
        return GuardDecision::deny(format!(
            "24h momentum {:.1}% > {:.1}% limit",
            input.return_24h_pct, cfg.fatigue_threshold_24h_pct
        ));
    }
    GuardDecision::allow("24h momentum within limit or acceleration-confirmed")
}

/// Signal-to-fill latency check, evaluated last (§4.G). Pure: does not
/// consume the per-symbol relax token even when it grants a relax. Callers
/// that act on `relax_used` must call [`consume_relax`] exactly once per
/// real evaluation — re-running this function with the same inputs is always
/// side-effect free and returns the same decision.
pub fn evaluate_late_fill(
    cfg: &GuardThresholds,
    state: &LateFillRelaxState,
    input: &LateFillInput,
) -> GuardDecision {
    let delay_ms = (input.exec_ts - input.signal_ts) as f64;

    if delay_ms <= cfg.latefill_base_ms {
        let mut d = GuardDecision::allow(format!(
            "delay {delay_ms:.0}ms within base threshold {:.0}ms",
            cfg.latefill_base_ms
        ));
        d.delay_ms = Some(delay_ms);
        return d;
    }

    let grace_ceiling = cfg.latefill_base_ms + cfg.latefill_grace_ms;
    let token_available = match state.last_relax_at {
        None => true,
        Some(last) => input.exec_ts - last >= cfg.latefill_cooldown_secs * 1_000,
    };
    let p99_exceeded = input.p99_order_latency_ms > cfg.latefill_p99_ms;

    if p99_exceeded && token_available && delay_ms <= grace_ceiling {
        let next_relax_time = input.exec_ts + cfg.latefill_cooldown_secs * 1_000;
        let mut d = GuardDecision::allow(format!(
            "delay {delay_ms:.0}ms exceeds base threshold but venue p99 relax applies"
        ));
        d.relax_used = true;
        d.relax_reason = Some(format!(
            "latefill_relax[p99_exceeded:{:.1}ms,grace:{}s]",
            input.p99_order_latency_ms,
            cfg.latefill_grace_ms / 1_000.0
        ));
        d.delay_ms = Some(delay_ms);
        d.next_relax_time = Some(next_relax_time);
        return d;
    }

    let next_relax_time = state
        .last_relax_at
        .map(|last| last + cfg.latefill_cooldown_secs * 1_000);
    let mut reason = format!(
        "late fill: {delay_ms:.1}ms > {:.1}ms base threshold",
        cfg.latefill_base_ms
    );
    if let Some(next) = next_relax_time {
        reason.push_str(&format!(" (p99 relax on cooldown until {next})"));
    }
    let mut d = GuardDecision::deny(reason);
    d.delay_ms = Some(delay_ms);
    d.next_relax_time = next_relax_time;
    d
}

/// Records a consumed relax token. Call at most once per real late-fill
/// evaluation that reported `relax_used`, mirroring `record_day_trade`'s
/// separation from `evaluate_pdt`: evaluation is a pure query, this is the
/// only mutation.
pub fn consume_relax(state: &mut LateFillRelaxState, at: i64) {
    state.last_relax_at = Some(at);
}

/// Evaluates the three guards in fixed order, short-circuiting at the first
/// denial (§4.G). Guards after a denial are reported as allowed-but-skipped
/// since the candidate is already rejected.
pub fn evaluate_guards(
    cfg: &GuardThresholds,
    relax_state: &LateFillRelaxState,
    freshness_input: &FreshnessInput,
    fatigue_input: &FatigueInput,
    late_fill_input: &LateFillInput,
) -> GuardResult {
    let freshness = evaluate_freshness(cfg, freshness_input);
    if !freshness.allowed {
        return GuardResult {
            freshness,
            fatigue: GuardDecision::allow("skipped: freshness denied"),
            late_fill: GuardDecision::allow("skipped: freshness denied"),
        };
    }

    let fatigue = evaluate_fatigue(cfg, fatigue_input);
    if !fatigue.allowed {
        return GuardResult {
            freshness,
            fatigue,
            late_fill: GuardDecision::allow("skipped: fatigue denied"),
        };
    }

    let late_fill = evaluate_late_fill(cfg, relax_state, late_fill_input);
    GuardResult {
        freshness,
        fatigue,
        late_fill,
    }
}
