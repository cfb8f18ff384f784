//! Regime weighter (§4.E): per-regime weight lookup, weighted blend of the
//! orthogonal panel into a `CompositeScore`, and per-factor attribution.

mod engine;
mod table;

pub use engine::score_candidate;
pub use table::RegimeWeightsTable;
