use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use cryptorun_orchestrator::{CandidateResult, WindowResult};

/// Writes `results.jsonl`, `report.md`, and `summary.json` into an
/// already-initialized run directory (§6: "per window, atomic write").
///
/// Each file is written to a sibling `.tmp` path and renamed into place, so
/// a reader never observes a partially-written artifact.
pub fn write_window_artifacts(run_dir: &Path, window: &WindowResult) -> Result<()> {
    write_atomic(&run_dir.join("results.jsonl"), &render_results_jsonl(window)?)?;
    write_atomic(&run_dir.join("report.md"), &render_report_md(window))?;
    write_atomic(&run_dir.join("summary.json"), &render_summary_json(window)?)?;
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => "tmp".to_string(),
    });
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp artifact failed: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename artifact into place failed: {}", path.display()))?;
    Ok(())
}

fn render_results_jsonl(window: &WindowResult) -> Result<String> {
    let mut out = String::new();
    for candidate in &window.candidates {
        out.push_str(&serde_json::to_string(candidate).context("serialize candidate result failed")?);
        out.push('\n');
    }
    out.push_str(&serde_json::to_string(&window.summary).context("serialize window summary failed")?);
    out.push('\n');
    Ok(out)
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    total: usize,
    passed: usize,
    skipped: usize,
    denied: usize,
    pass_rate: f64,
    freshness_denials: usize,
    fatigue_denials: usize,
    late_fill_denials: usize,
    relax_events: usize,
    throttle_events: usize,
    top_symbols: Vec<&'a str>,
}

fn render_summary_json(window: &WindowResult) -> Result<String> {
    let summary = &window.summary;
    let pass_rate = if summary.total == 0 {
        0.0
    } else {
        summary.passed as f64 / summary.total as f64
    };
    let top_symbols = window
        .candidates
        .iter()
        .filter(|c| c.passed)
        .take(10)
        .map(|c| c.symbol.as_str())
        .collect();

    let payload = SummaryJson {
        total: summary.total,
        passed: summary.passed,
        skipped: summary.skipped,
        denied: summary.denied,
        pass_rate,
        freshness_denials: summary.freshness_denials,
        fatigue_denials: summary.fatigue_denials,
        late_fill_denials: summary.late_fill_denials,
        relax_events: summary.relax_events,
        throttle_events: summary.throttle_events,
        top_symbols,
    };
    let json = serde_json::to_string_pretty(&payload).context("serialize summary.json failed")?;
    Ok(format!("{json}\n"))
}

fn render_report_md(window: &WindowResult) -> String {
    let summary = &window.summary;
    let pass_rate = if summary.total == 0 {
        0.0
    } else {
        summary.passed as f64 / summary.total as f64 * 100.0
    };

    let mut md = String::new();
    md.push_str("# Scan report\n\n");
    md.push_str(&format!(
        "Total candidates: {} — passed {} ({:.1}%), skipped {}, denied {}\n\n",
        summary.total, summary.passed, pass_rate, summary.skipped, summary.denied
    ));

    md.push_str("## Guard attribution\n\n");
    md.push_str(&format!("- freshness denials: {}\n", summary.freshness_denials));
    md.push_str(&format!("- fatigue denials: {}\n", summary.fatigue_denials));
    md.push_str(&format!("- late-fill denials: {}\n", summary.late_fill_denials));
    md.push_str(&format!("- relax events: {}\n", summary.relax_events));
    md.push_str(&format!("- throttle events: {}\n\n", summary.throttle_events));

    if !summary.skip_reasons.is_empty() {
        md.push_str("## Top skip reasons\n\n");
        let ranked = rank_skip_reasons(&summary.skip_reasons);
        for (reason, count) in ranked.iter().take(10) {
            md.push_str(&format!("- {reason}: {count}\n"));
        }
        md.push('\n');
    }

    md.push_str("## Passed candidates\n\n");
    let passed: Vec<&CandidateResult> = window.candidates.iter().filter(|c| c.passed).collect();
    if passed.is_empty() {
        md.push_str("(none)\n");
    } else {
        md.push_str("| symbol | score |\n|---|---|\n");
        for candidate in &passed {
            md.push_str(&format!(
                "| {} | {:.2} |\n",
                candidate.symbol,
                candidate.score.unwrap_or_default()
            ));
        }
    }

    md
}

fn rank_skip_reasons(reasons: &BTreeMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut ranked: Vec<_> = reasons.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptorun_orchestrator::{CandidateResult, WindowSummary};

    fn passed_result(symbol: &str, score: f64) -> CandidateResult {
        CandidateResult {
            symbol: symbol.to_string(),
            scan_ts: 1_700_000_000,
            score: Some(score),
            passed: true,
            fail_reason: None,
            guard_result: None,
            micro_result: None,
            attribution: Vec::new(),
            pnl_pct: None,
            pnl_error: None,
        }
    }

    #[test]
    fn results_jsonl_has_one_line_per_candidate_plus_summary() {
        let window = WindowResult {
            candidates: vec![passed_result("AAA", 90.0), passed_result("BBB", 80.0)],
            summary: WindowSummary {
                total: 2,
                passed: 2,
                ..Default::default()
            },
        };
        let rendered = render_results_jsonl(&window).unwrap();
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn report_md_lists_passed_candidates() {
        let window = WindowResult {
            candidates: vec![passed_result("AAA", 90.0)],
            summary: WindowSummary {
                total: 1,
                passed: 1,
                ..Default::default()
            },
        };
        let md = render_report_md(&window);
        assert!(md.contains("AAA"));
        assert!(md.contains("90.00"));
    }

    #[test]
    fn summary_json_computes_pass_rate() {
        let window = WindowResult {
            candidates: vec![passed_result("AAA", 90.0)],
            summary: WindowSummary {
                total: 4,
                passed: 1,
                ..Default::default()
            },
        };
        let json = render_summary_json(&window).unwrap();
        assert!(json.contains("\"pass_rate\": 0.25"));
    }

    #[test]
    fn write_window_artifacts_renames_into_place() {
        let tmp = tempfile::tempdir().unwrap();
        let window = WindowResult {
            candidates: vec![passed_result("AAA", 90.0)],
            summary: WindowSummary {
                total: 1,
                passed: 1,
                ..Default::default()
            },
        };
        write_window_artifacts(tmp.path(), &window).unwrap();

        assert!(tmp.path().join("results.jsonl").exists());
        assert!(tmp.path().join("report.md").exists());
        assert!(tmp.path().join("summary.json").exists());
        assert!(!tmp.path().join("results.jsonl.tmp").exists());
    }
}
