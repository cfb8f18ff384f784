//! Orthogonalizer (§4.D): batch Gram–Schmidt residualization of the raw
//! factor panel with momentum protection. Operates on a full scan-window
//! batch at once — no streaming residualization (§9 design notes).

mod engine;

pub use engine::{
    max_pairwise_abs_correlation, orthogonalize, verify_batch_invariants,
    MAX_PAIRWISE_ABS_CORRELATION, MIN_CORRELATION_BATCH,
};
