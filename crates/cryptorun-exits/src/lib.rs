//! Exit evaluator (§4.H): first-trigger-wins precedence over seven exit
//! reasons, evaluated against an open position's tracked state once its HWM
//! has been refreshed for the current tick.

mod engine;
mod types;

pub use engine::{evaluate_exits, record_profit_target};
pub use types::{ExitMarketInput, ExitThresholds};
