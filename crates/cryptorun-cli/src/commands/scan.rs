use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use cryptorun_artifacts::{init_scan_artifacts, InitScanArtifactsArgs};
use cryptorun_gates::GateThresholds;
use cryptorun_guards::GuardThresholds;
use cryptorun_orchestrator::{CandidateDataSource, ScanEngine, WindowConfig};
use cryptorun_regime::RegimeWeightsTable;
use cryptorun_schemas::{Candidate, ExitCode, MicroThresholds, Regime};

pub struct ScanArgs {
    pub config_paths: Vec<String>,
    pub symbols: Vec<String>,
    pub regime: String,
    pub scan_ts: Option<i64>,
    pub exports_root: String,
}

/// Load config, run one scan window, and write its artifacts.
///
/// Without the `testkit` feature there is no `CandidateDataSource` wired up:
/// concrete venue adapters are out of scope (§1 Non-goals), so this command
/// only has a path to real data through the in-memory fixture source. That
/// source serves each requested symbol a baseline synthetic snapshot — this
/// validates the pipeline wiring end to end, not a live signal.
pub async fn run(args: ScanArgs) -> i32 {
    let path_refs: Vec<&str> = args.config_paths.iter().map(String::as_str).collect();

    let (cfg, loaded) = match cryptorun_config::load_config(&path_refs) {
        Ok(pair) => pair,
        Err(err) => {
            tracing::error!(error = %err, "config load failed");
            return ExitCode::ConfigError as i32;
        }
    };

    let regime = match Regime::parse(&args.regime) {
        Some(r) => r,
        None => {
            tracing::error!(regime = %args.regime, "unrecognized regime tag");
            return ExitCode::ConfigError as i32;
        }
    };

    let weights = match RegimeWeightsTable::new(cfg.regime_weights.clone()) {
        Ok(w) => w,
        Err(err) => {
            tracing::error!(error = %err, "regime weights invalid");
            return ExitCode::ConfigError as i32;
        }
    };

    let window_config = WindowConfig {
        top_n: cfg.top_n,
        worker_pool_size: cfg.worker_pool_size,
        fetch_deadline: Duration::from_secs((cfg.stride_secs.max(4) as u64 / 4).max(1)),
        gate_thresholds: GateThresholds {
            score_min: cfg.score_threshold,
            vadr_min: cfg.vadr_min,
        },
        guard_thresholds: GuardThresholds {
            freshness_max_bars: cfg.guard_freshness_max_bars,
            freshness_atr_factor: cfg.guard_freshness_atr_factor,
            fatigue_threshold_24h_pct: cfg.guard_fatigue_threshold_24h_pct,
            latefill_base_ms: cfg.guard_latefill_base_ms,
            latefill_p99_ms: cfg.guard_latefill_p99_ms,
            latefill_grace_ms: cfg.guard_latefill_grace_ms,
            latefill_cooldown_secs: cfg.guard_latefill_cooldown_secs,
        },
        micro_thresholds: MicroThresholds {
            spread_bps_max: cfg.spread_bps_max,
            depth_usd_min: cfg.depth_usd_min,
            vadr_min: cfg.vadr_min,
            ..MicroThresholds::default()
        },
    };

    let scan_ts = args.scan_ts.unwrap_or_else(|| Utc::now().timestamp());
    let candidates: Vec<Candidate> = args
        .symbols
        .iter()
        .map(|s| Candidate::new(s.clone(), scan_ts, regime.as_str()))
        .collect();

    let source: Arc<dyn CandidateDataSource> = match build_data_source(&candidates) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let engine = ScanEngine::new(window_config, weights);
    let window_result = match engine.run_window(candidates, source).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "scan window aborted");
            return match err {
                cryptorun_schemas::CoreError::InvariantViolation { .. } => ExitCode::InvariantViolation as i32,
                _ => ExitCode::ProviderUnavailable as i32,
            };
        }
    };

    let run_id = Uuid::new_v4();
    let init = match init_scan_artifacts(InitScanArtifactsArgs {
        exports_root: &PathBuf::from(&args.exports_root),
        schema_version: 1,
        run_id,
        config_hash: &loaded.config_hash,
        scan_ts,
    }) {
        Ok(init) => init,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize scan artifacts");
            return ExitCode::ProviderUnavailable as i32;
        }
    };

    if let Err(err) = cryptorun_artifacts::write_window_artifacts(&init.run_dir, &window_result) {
        tracing::error!(error = %err, "failed to write scan artifacts");
        return ExitCode::ProviderUnavailable as i32;
    }

    println!("run_id={run_id}");
    println!("run_dir={}", init.run_dir.display());
    println!(
        "total={} passed={} skipped={} denied={}",
        window_result.summary.total,
        window_result.summary.passed,
        window_result.summary.skipped,
        window_result.summary.denied
    );

    if window_result.summary.total > 0 && window_result.summary.skipped == window_result.summary.total {
        return ExitCode::AllCandidatesSkipped as i32;
    }

    ExitCode::Success as i32
}

#[cfg(feature = "testkit")]
fn build_data_source(candidates: &[Candidate]) -> Result<Arc<dyn CandidateDataSource>, i32> {
    use cryptorun_testkit::{sample_candidate_snapshot, InMemoryCandidateDataSource};

    let mut source = InMemoryCandidateDataSource::new();
    for (i, candidate) in candidates.iter().enumerate() {
        source = source.with_snapshot(candidate.symbol.clone(), sample_candidate_snapshot(i as f64 * 2.0));
    }
    Ok(Arc::new(source))
}

#[cfg(not(feature = "testkit"))]
fn build_data_source(_candidates: &[Candidate]) -> Result<Arc<dyn CandidateDataSource>, i32> {
    tracing::error!(
        "no CandidateDataSource wired into this build; rebuild with --features testkit for a synthetic dry run, \
         or supply a provider-backed adapter once one exists"
    );
    Err(ExitCode::ProviderUnavailable as i32)
}
