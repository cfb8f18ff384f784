use cryptorun_guards::{FatigueInput, FreshnessInput, GuardThresholds, RelaxMap};

fn fresh() -> FreshnessInput {
    FreshnessInput {
        bar_age: 0,
        price_distance: 1.0,
        atr: 10.0,
    }
}

fn unfatigued() -> FatigueInput {
    FatigueInput {
        return_24h_pct: 6.0,
        acceleration_confirmed: false,
    }
}

#[test]
fn scenario_p99_relax_then_cooldown_denial() {
    let cfg = GuardThresholds::default();
    let map = RelaxMap::new();
    let symbol = "SOL-USD";

    // First candidate: delay exceeds the base threshold, but venue p99
    // latency is elevated and no relax has been used yet, so it is allowed.
    let first_exec = cfg.latefill_base_ms as i64 + 15_000;
    let first = map.evaluate(
        &cfg,
        symbol,
        &fresh(),
        &unfatigued(),
        &cryptorun_guards::LateFillInput {
            signal_ts: 0,
            exec_ts: first_exec,
            p99_order_latency_ms: 500.0,
        },
    );
    assert!(first.late_fill.allowed);
    assert!(first.late_fill.relax_used);
    assert!(result_relax_reason_mentions_p99(&first));

    // Second candidate minutes later, still on cooldown: relax is denied and
    // the late-fill guard blocks the candidate.
    let second_exec = first_exec + 5 * 60_000;
    let second = map.evaluate(
        &cfg,
        symbol,
        &fresh(),
        &unfatigued(),
        &cryptorun_guards::LateFillInput {
            signal_ts: 0,
            exec_ts: second_exec,
            p99_order_latency_ms: 500.0,
        },
    );
    assert!(!second.late_fill.allowed);
    assert!(!second.passed());
}

fn result_relax_reason_mentions_p99(result: &cryptorun_schemas::GuardResult) -> bool {
    result
        .late_fill
        .relax_reason
        .as_ref()
        .map(|r| r.contains("p99_exceeded"))
        .unwrap_or(false)
}
