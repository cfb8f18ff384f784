//! Exchange-native microstructure evaluator (§4.B): per-venue spread/depth/
//! VADR thresholds and ≥2-venue consensus, pure over caller-supplied
//! snapshots — no provider I/O here.

mod engine;
mod types;

pub use engine::{evaluate_consensus, evaluate_venue};
pub use types::VenueSnapshot;
