use cryptorun_guards::{evaluate_guards, FatigueInput, FreshnessInput, GuardThresholds, LateFillInput};
use cryptorun_schemas::LateFillRelaxState;

#[test]
fn scenario_happy_path_all_guards_pass() {
    let cfg = GuardThresholds::default();
    let relax = LateFillRelaxState::default();

    let result = evaluate_guards(
        &cfg,
        &relax,
        &FreshnessInput {
            bar_age: 1,
            price_distance: 5.0,
            atr: 10.0,
        },
        &FatigueInput {
            return_24h_pct: 8.0,
            acceleration_confirmed: false,
        },
        &LateFillInput {
            signal_ts: 0,
            exec_ts: 12_000,
            p99_order_latency_ms: 120.0,
        },
    );

    assert!(result.passed());
    assert!(!result.late_fill.relax_used);
}
