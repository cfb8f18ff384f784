//! Entry guards (§4.G): freshness, fatigue, and late-fill checks applied
//! after gates pass, in fixed order, with the late-fill guard allowed a
//! bounded p99-latency relaxation per symbol per cooldown window.

mod engine;
mod relax_map;
mod types;

pub use engine::{consume_relax, evaluate_fatigue, evaluate_freshness, evaluate_guards, evaluate_late_fill};
pub use relax_map::RelaxMap;
pub use types::{FatigueInput, FreshnessInput, GuardThresholds, LateFillInput};
