use cryptorun_schemas::{CoreError, Regime, RegimeWeights};
use std::collections::BTreeMap;

/// Validated per-regime weight lookup (§4.E: "validate sum=1.0").
#[derive(Clone, Debug, PartialEq)]
pub struct RegimeWeightsTable {
    weights: BTreeMap<Regime, RegimeWeights>,
}

impl RegimeWeightsTable {
    /// Build a table from a full mapping, rejecting it outright if any
    /// regime is missing or its weights don't sum to 1.0 — a bad config
    /// should fail at load time, not mid-scan.
    pub fn new(weights: BTreeMap<Regime, RegimeWeights>) -> Result<Self, CoreError> {
        for regime in Regime::ALL {
            match weights.get(&regime) {
                None => {
                    return Err(CoreError::InvariantViolation {
                        detail: format!("missing regime_weights entry for '{regime}'"),
                    })
                }
                Some(w) if !w.is_valid() => {
                    return Err(CoreError::InvariantViolation {
                        detail: format!(
                            "regime_weights for '{regime}' sum to {:.6}, expected 1.0",
                            w.sum()
                        ),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(Self { weights })
    }

    pub fn get(&self, regime: Regime) -> RegimeWeights {
        // `new` guarantees every `Regime::ALL` entry is present.
        self.weights[&regime]
    }
}
