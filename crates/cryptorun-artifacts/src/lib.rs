//! Scan artifact writer (§6 External Interfaces): `results.jsonl`,
//! `report.md`, `summary.json`, and a run manifest, written atomically into
//! a date-partitioned run directory.

mod manifest;
mod report;

pub use manifest::{init_scan_artifacts, ArtifactList, InitScanArtifactsArgs, InitScanArtifactsResult, RunManifest};
pub use report::write_window_artifacts;
