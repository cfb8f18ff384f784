//! Shared test fixtures and fakes for exercising the scan pipeline without
//! real provider I/O: deterministic synthetic factor panels, baseline
//! candidate snapshots, and an in-memory `CandidateDataSource`.

mod fake_source;
mod fixtures;

pub use fake_source::InMemoryCandidateDataSource;
pub use fixtures::{
    default_window_config, sample_candidate, sample_candidate_snapshot, sample_candidates, sample_venue_snapshot,
    sample_venues, synthetic_raw_factors_panel, uniform_regime_weights,
};
