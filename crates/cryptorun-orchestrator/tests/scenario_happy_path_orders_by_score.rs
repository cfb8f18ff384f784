use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use cryptorun_factors::FactorSnapshot;
use cryptorun_guards::{FatigueInput, FreshnessInput, LateFillInput};
use cryptorun_micro::VenueSnapshot;
use cryptorun_orchestrator::{CandidateDataSource, CandidateSnapshot, ScanEngine, WindowConfig};
use cryptorun_regime::RegimeWeightsTable;
use cryptorun_schemas::{Candidate, CoreError, RawFactors, Regime, RegimeWeights, Venue};

fn venue_snapshot(venue: Venue, vadr: f64) -> VenueSnapshot {
    VenueSnapshot {
        venue,
        bid: 99.9,
        ask: 100.0,
        depth_2pct_usd: 250_000.0,
        depth_half_pct_usd: 150_000.0,
        vadr,
        data_age_secs: 1.0,
    }
}

fn snapshot_for(momentum_core: f64, vadr: f64) -> CandidateSnapshot {
    CandidateSnapshot {
        factors: FactorSnapshot {
            raw: RawFactors {
                momentum_core,
                technical: 0.3,
                volume: 0.4,
                quality: 0.5,
                social: 2.0,
            },
            catalyst_score: 0.6,
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
        venues: vec![
            venue_snapshot(Venue::Binance, vadr),
            venue_snapshot(Venue::Okx, vadr),
        ],
    }
}

struct FixedSource {
    snapshots: HashMap<String, CandidateSnapshot>,
}

#[async_trait]
impl CandidateDataSource for FixedSource {
    async fn fetch_snapshot(&self, candidate: &Candidate) -> Result<CandidateSnapshot, CoreError> {
        Ok(self.snapshots[&candidate.symbol].clone())
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
async fn scenario_happy_path_orders_by_score() {
    let candidates = vec![
        Candidate::new("LOW-USD", 1_700_000_000, "normal"),
        Candidate::new("HIGH-USD", 1_700_000_000, "normal"),
        Candidate::new("MID-USD", 1_700_000_000, "normal"),
    ];

    let mut snapshots = HashMap::new();
    snapshots.insert("LOW-USD".to_string(), snapshot_for(5.0, 2.2));
    snapshots.insert("HIGH-USD".to_string(), snapshot_for(90.0, 2.2));
    snapshots.insert("MID-USD".to_string(), snapshot_for(40.0, 2.2));

    let engine = ScanEngine::new(WindowConfig::default(), uniform_weights());
    let source: Arc<dyn CandidateDataSource> = Arc::new(FixedSource { snapshots });

    let window = engine.run_window(candidates, source).await.unwrap();

    assert_eq!(window.summary.total, 3);
    assert_eq!(window.candidates.len(), 3);

    let symbols: Vec<&str> = window.candidates.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["HIGH-USD", "MID-USD", "LOW-USD"]);

    for pair in window.candidates.windows(2) {
        assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
    }
}
