use std::collections::BTreeMap;

use cryptorun_factors::FactorSnapshot;
use cryptorun_guards::{FatigueInput, FreshnessInput, LateFillInput};
use cryptorun_micro::VenueSnapshot;
use cryptorun_orchestrator::{CandidateSnapshot, WindowConfig};
use cryptorun_regime::RegimeWeightsTable;
use cryptorun_schemas::{Candidate, RawFactors, Regime, RegimeWeights, Venue};

/// A small deterministic PRNG for synthetic fixtures, so repeated test runs
/// see the same panel without depending on a real RNG crate.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 33) as f64 / u32::MAX as f64) - 0.5
    }
}

/// One candidate with a deterministic symbol derived from its index.
pub fn sample_candidate(index: usize, scan_ts: i64, regime: Regime) -> Candidate {
    Candidate::new(format!("SYN{index}-USD"), scan_ts, regime.as_str())
}

/// `n` candidates sharing one scan tick and regime, indices 0..n.
pub fn sample_candidates(n: usize, scan_ts: i64, regime: Regime) -> Vec<Candidate> {
    (0..n).map(|i| sample_candidate(i, scan_ts, regime)).collect()
}

/// A synthetic raw-factor panel with no cross-column structure, suitable for
/// exercising the orthogonalizer's batch invariants without real market data.
pub fn synthetic_raw_factors_panel(n: usize, seed: u64) -> Vec<RawFactors> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| RawFactors {
            momentum_core: rng.next_unit() * 10.0,
            technical: rng.next_unit() * 10.0,
            volume: rng.next_unit() * 10.0,
            quality: rng.next_unit() * 10.0,
            social: rng.next_unit() * 10.0,
        })
        .collect()
}

/// A single venue snapshot that passes every default `MicroThresholds` check.
pub fn sample_venue_snapshot(venue: Venue) -> VenueSnapshot {
    VenueSnapshot {
        venue,
        bid: 99.95,
        ask: 100.0,
        depth_2pct_usd: 500_000.0,
        depth_half_pct_usd: 300_000.0,
        vadr: 2.2,
        data_age_secs: 1.0,
    }
}

/// Two consenting venues, the minimum the microstructure evaluator accepts.
pub fn sample_venues() -> Vec<VenueSnapshot> {
    vec![
        sample_venue_snapshot(Venue::Binance),
        sample_venue_snapshot(Venue::Okx),
    ]
}

/// A whole candidate snapshot that clears every guard, gate, and the
/// microstructure consensus check by default — a baseline a test can mutate
/// one field at a time to exercise a single failure mode.
pub fn sample_candidate_snapshot(momentum_core: f64) -> CandidateSnapshot {
    CandidateSnapshot {
        factors: FactorSnapshot {
            raw: RawFactors {
                momentum_core,
                technical: 0.2,
                volume: 0.3,
                quality: 0.4,
                social: 1.0,
            },
            catalyst_score: 0.5,
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
        venues: sample_venues(),
    }
}

/// Equal `RegimeWeights` for all seven regimes, useful whenever a test does
/// not care about regime-specific blending.
pub fn uniform_regime_weights() -> RegimeWeightsTable {
    let weights = RegimeWeights {
        momentum_core: 0.4,
        technical_resid: 0.2,
        supply_demand_block: 0.25,
        catalyst_block: 0.15,
    };
    let table: BTreeMap<Regime, RegimeWeights> = Regime::ALL.iter().map(|r| (*r, weights)).collect();
    RegimeWeightsTable::new(table).expect("uniform weights always validate")
}

pub fn default_window_config() -> WindowConfig {
    WindowConfig::default()
}
