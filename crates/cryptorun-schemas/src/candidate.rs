use serde::{Deserialize, Serialize};

/// A scan candidate, created by the orchestrator once per window.
///
/// Immutable for the lifetime of the scan it was created in — every stage of
/// the pipeline (factors → orthogonalize → score → gates → guards → micro)
/// reads `symbol`/`scan_ts`/`regime_tag` from the same `Candidate` value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    /// Window timestamp, epoch seconds UTC.
    pub scan_ts: i64,
    /// Opaque regime tag supplied by an external regime detector.
    pub regime_tag: String,
}

impl Candidate {
    pub fn new(symbol: impl Into<String>, scan_ts: i64, regime_tag: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            scan_ts,
            regime_tag: regime_tag.into(),
        }
    }
}
