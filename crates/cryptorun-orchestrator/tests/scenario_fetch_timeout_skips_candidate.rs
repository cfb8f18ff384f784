use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cryptorun_factors::FactorSnapshot;
use cryptorun_guards::{FatigueInput, FreshnessInput, LateFillInput};
use cryptorun_orchestrator::{CandidateDataSource, CandidateSnapshot, ScanEngine, WindowConfig};
use cryptorun_regime::RegimeWeightsTable;
use cryptorun_schemas::{Candidate, CoreError, RawFactors, Regime, RegimeWeights};

struct SlowSource;

#[async_trait]
impl CandidateDataSource for SlowSource {
    async fn fetch_snapshot(&self, _candidate: &Candidate) -> Result<CandidateSnapshot, CoreError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(CandidateSnapshot {
            factors: FactorSnapshot {
                raw: RawFactors {
                    momentum_core: 10.0,
                    technical: 0.1,
                    volume: 0.1,
                    quality: 0.1,
                    social: 1.0,
                },
                catalyst_score: 0.2,
                funding_divergence: true,
            },
            freshness: FreshnessInput {
                bar_age: 0,
                price_distance: 1.0,
                atr: 10.0,
            },
            fatigue: FatigueInput {
                return_24h_pct: 4.0,
                acceleration_confirmed: false,
            },
            late_fill: LateFillInput {
                signal_ts: 0,
                exec_ts: 5_000,
                p99_order_latency_ms: 150.0,
            },
            venues: Vec::new(),
        })
    }
}

fn uniform_weights() -> RegimeWeightsTable {
    let weights = RegimeWeights {
        momentum_core: 0.4,
        technical_resid: 0.2,
        supply_demand_block: 0.25,
        catalyst_block: 0.15,
    };
    let table: BTreeMap<Regime, RegimeWeights> = Regime::ALL.iter().map(|r| (*r, weights)).collect();
    RegimeWeightsTable::new(table).unwrap()
}

#[tokio::test]
async fn scenario_fetch_timeout_skips_candidate() {
    let mut config = WindowConfig::default();
    config.fetch_deadline = Duration::from_millis(10);

    let engine = ScanEngine::new(config, uniform_weights());
    let source: Arc<dyn CandidateDataSource> = Arc::new(SlowSource);

    let candidates = vec![Candidate::new("SLOW-USD", 1_700_000_000, "normal")];
    let window = engine.run_window(candidates, source).await.unwrap();

    assert_eq!(window.candidates.len(), 1);
    let result = &window.candidates[0];
    assert!(!result.passed);
    assert!(result.score.is_none());
    assert!(result.fail_reason.as_ref().unwrap().contains("cancelled"));

    assert_eq!(window.summary.skipped, 1);
    assert_eq!(window.summary.denied, 0);
    assert_eq!(window.summary.skip_reasons.get("cancelled"), Some(&1));
}
