use std::collections::HashMap;

use cryptorun_schemas::LateFillRelaxState;
use parking_lot::RwLock;

use crate::{evaluate_guards, consume_relax, FatigueInput, FreshnessInput, GuardThresholds, LateFillInput};

/// Process-wide per-symbol late-fill relax state (§5: read-intensive lookup,
/// write-locked only for the rare token consumption). One instance is shared
/// across the worker pool for the life of a scan.
#[derive(Default)]
pub struct RelaxMap {
    inner: RwLock<HashMap<String, LateFillRelaxState>>,
}

impl RelaxMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current relax state for a symbol, or the default (no prior relax) if
    /// unseen. Takes only a read lock.
    pub fn get(&self, symbol: &str) -> LateFillRelaxState {
        self.inner.read().get(symbol).copied().unwrap_or_default()
    }

    /// Records a consumed relax token for a symbol. Takes the write lock.
    pub fn consume(&self, symbol: &str, at: i64) {
        let mut guard = self.inner.write();
        let state = guard.entry(symbol.to_string()).or_default();
        consume_relax(state, at);
    }

    /// Evaluates all three guards for a symbol and, if the late-fill guard
    /// reports a relax, consumes the token for this symbol under the write
    /// lock. This is the single entry point the orchestrator calls per
    /// candidate per scan tick, so the idempotence invariant on
    /// [`crate::evaluate_late_fill`] holds by construction: each real
    /// candidate evaluation calls this exactly once.
    pub fn evaluate(
        &self,
        cfg: &GuardThresholds,
        symbol: &str,
        freshness_input: &FreshnessInput,
        fatigue_input: &FatigueInput,
        late_fill_input: &LateFillInput,
    ) -> cryptorun_schemas::GuardResult {
        let state = self.get(symbol);
        let result = evaluate_guards(cfg, &state, freshness_input, fatigue_input, late_fill_input);
        if result.late_fill.relax_used {
            self.consume(symbol, late_fill_input.exec_ts);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn late_fill_needing_relax(cfg: &GuardThresholds, exec_ts: i64) -> LateFillInput {
        LateFillInput {
            signal_ts: 0,
            exec_ts,
            p99_order_latency_ms: 450.0,
        }
    }

    fn fresh() -> FreshnessInput {
        FreshnessInput {
            bar_age: 0,
            price_distance: 1.0,
            atr: 10.0,
        }
    }

    fn unfatigued() -> FatigueInput {
        FatigueInput {
            return_24h_pct: 5.0,
            acceleration_confirmed: false,
        }
    }

    #[test]
    fn unseen_symbol_starts_with_no_relax_history() {
        let map = RelaxMap::new();
        assert_eq!(map.get("BTC-USD"), LateFillRelaxState::default());
    }

    #[test]
    fn evaluate_consumes_relax_token_once_per_call() {
        let cfg = GuardThresholds::default();
        let map = RelaxMap::new();
        let exec_ts = cfg.latefill_base_ms as i64 + 10_000;

        let result = map.evaluate(
            &cfg,
            "BTC-USD",
            &fresh(),
            &unfatigued(),
            &late_fill_needing_relax(&cfg, exec_ts),
        );
        assert!(result.late_fill.relax_used);
        assert_eq!(map.get("BTC-USD").last_relax_at, Some(exec_ts));
    }

    #[test]
    fn second_relax_within_cooldown_is_denied() {
        let cfg = GuardThresholds::default();
        let map = RelaxMap::new();
        let first_exec = cfg.latefill_base_ms as i64 + 10_000;

        map.evaluate(
            &cfg,
            "BTC-USD",
            &fresh(),
            &unfatigued(),
            &late_fill_needing_relax(&cfg, first_exec),
        );

        let second_exec = first_exec + 60_000; // well under the 1800s cooldown
        let second = map.evaluate(
            &cfg,
            "BTC-USD",
            &fresh(),
            &unfatigued(),
            &late_fill_needing_relax(&cfg, second_exec),
        );
        assert!(!second.late_fill.allowed);
    }

    #[test]
    fn relax_state_is_tracked_independently_per_symbol() {
        let cfg = GuardThresholds::default();
        let map = RelaxMap::new();
        let exec_ts = cfg.latefill_base_ms as i64 + 10_000;

        map.evaluate(
            &cfg,
            "BTC-USD",
            &fresh(),
            &unfatigued(),
            &late_fill_needing_relax(&cfg, exec_ts),
        );

        assert_eq!(map.get("ETH-USD"), LateFillRelaxState::default());
    }
}
