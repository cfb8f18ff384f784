//! Scan orchestrator (§4.I): drives one window of candidates through the
//! full pipeline — fetch, orthogonalize, microstructure, score, gate,
//! guard — with bounded worker-pool concurrency and a single batch barrier
//! at the orthogonalizer.

mod runner;
mod source;
mod types;

pub use runner::ScanEngine;
pub use source::{CandidateDataSource, CandidateSnapshot};
pub use types::{CandidateResult, WindowConfig, WindowResult, WindowSummary};
