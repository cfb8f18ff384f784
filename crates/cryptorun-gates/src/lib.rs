//! Entry gates (§4.F): hard, non-retriable thresholds applied in fixed
//! order after scoring and before guards.

mod engine;
mod types;

pub use engine::evaluate_gates;
pub use types::{BlockingGate, GateInput, GateResult, GateThresholds};
