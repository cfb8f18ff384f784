//! Factor extractor (§4.C): builds the raw, pre-orthogonalization factor
//! panel for one candidate from cached provider snapshots and derived
//! technical/volume/quality inputs.

mod engine;
mod types;

pub use engine::{
    catalyst_score, extract_raw_factors, funding_divergence, quality_composite,
    technical_composite, volume_zscore,
};
pub use types::{FactorSnapshot, QualityInputs, TechnicalInputs, VolumeInputs};
