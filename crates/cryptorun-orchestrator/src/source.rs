use async_trait::async_trait;
use cryptorun_factors::FactorSnapshot;
use cryptorun_guards::{FatigueInput, FreshnessInput, LateFillInput};
use cryptorun_micro::VenueSnapshot;
use cryptorun_schemas::{Candidate, CoreError};

/// Everything one candidate's pipeline run needs, pulled from cached
/// provider data in a single fetch (§4.C: "Factor Extractor pulls cached
/// provider data"). This is the orchestrator's one external-call seam per
/// candidate — the suspension point §5 calls out as "any provider fetch
/// (awaits rate-limit token or I/O)".
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateSnapshot {
    pub factors: FactorSnapshot,
    pub freshness: FreshnessInput,
    pub fatigue: FatigueInput,
    pub late_fill: LateFillInput,
    pub venues: Vec<VenueSnapshot>,
}

/// Collaborator boundary the orchestrator drives per candidate per window
/// (§6 "Provider contract", narrowed to what the scan pipeline consumes).
///
/// A concrete implementation composes the real `cryptorun-providers` trait
/// objects plus `cryptorun-factors` extraction; this crate only depends on
/// the narrow contract so its worker-pool/barrier logic is testable without
/// any network stack.
#[async_trait]
pub trait CandidateDataSource: Send + Sync {
    async fn fetch_snapshot(&self, candidate: &Candidate) -> Result<CandidateSnapshot, CoreError>;
}
