use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: String,
    pub scan_ts: i64,
    pub created_at_utc: DateTime<Utc>,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub results_jsonl: String,
    pub report_md: String,
    pub summary_json: String,
    pub manifest_json: String,
}

pub struct InitScanArtifactsArgs<'a> {
    /// Root export directory, e.g. `./exports`. The run lands under
    /// `<exports_root>/<YYYY-MM-DD>/<run_id>/` (§6: "output directory is
    /// date-partitioned").
    pub exports_root: &'a Path,
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: &'a str,
    pub scan_ts: i64,
}

pub struct InitScanArtifactsResult {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
}

/// Creates the date-partitioned run directory, placeholder artifact files,
/// and the run manifest. Placeholders are created only if missing; the
/// manifest is always rewritten since it is deterministic for a run start.
pub fn init_scan_artifacts(args: InitScanArtifactsArgs<'_>) -> Result<InitScanArtifactsResult> {
    let created_at_utc = Utc::now();
    let date_partition = created_at_utc.format("%Y-%m-%d").to_string();
    let run_dir = args
        .exports_root
        .join(date_partition)
        .join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    ensure_file_exists_with(&run_dir.join("results.jsonl"), "")?;
    ensure_file_exists_with(&run_dir.join("report.md"), "# Scan report\n\n(pending)\n")?;
    ensure_file_exists_with(&run_dir.join("summary.json"), "{}\n")?;

    let manifest = RunManifest {
        schema_version: args.schema_version,
        run_id: args.run_id,
        config_hash: args.config_hash.to_string(),
        scan_ts: args.scan_ts,
        created_at_utc,
        artifacts: ArtifactList {
            results_jsonl: "results.jsonl".to_string(),
            report_md: "report.md".to_string(),
            summary_json: "summary.json".to_string(),
            manifest_json: "manifest.json".to_string(),
        },
    };

    let manifest_path = run_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(InitScanArtifactsResult {
        run_dir,
        manifest_path,
    })
}

fn ensure_file_exists_with(path: &Path, contents_if_create: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, contents_if_create)
        .with_context(|| format!("create placeholder failed: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_date_partitioned_run_dir_with_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let result = init_scan_artifacts(InitScanArtifactsArgs {
            exports_root: tmp.path(),
            schema_version: 1,
            run_id: Uuid::nil(),
            config_hash: "deadbeef",
            scan_ts: 1_700_000_000,
        })
        .unwrap();

        assert!(result.run_dir.join("results.jsonl").exists());
        assert!(result.run_dir.join("report.md").exists());
        assert!(result.run_dir.join("summary.json").exists());
        assert!(result.manifest_path.exists());

        let date_dir = result.run_dir.parent().unwrap();
        assert_ne!(date_dir, tmp.path());
    }

    #[test]
    fn existing_placeholder_is_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let first = init_scan_artifacts(InitScanArtifactsArgs {
            exports_root: tmp.path(),
            schema_version: 1,
            run_id: Uuid::nil(),
            config_hash: "deadbeef",
            scan_ts: 1_700_000_000,
        })
        .unwrap();
        fs::write(first.run_dir.join("results.jsonl"), "custom\n").unwrap();

        init_scan_artifacts(InitScanArtifactsArgs {
            exports_root: tmp.path(),
            schema_version: 1,
            run_id: Uuid::nil(),
            config_hash: "deadbeef",
            scan_ts: 1_700_000_000,
        })
        .unwrap();

        let contents = fs::read_to_string(first.run_dir.join("results.jsonl")).unwrap();
        assert_eq!(contents, "custom\n");
    }
}
