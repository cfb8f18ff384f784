use cryptorun_schemas::{CoreError, OrthogonalFactors, RawFactors};
use statrs::statistics::Statistics;

/// Columns below this variance are treated as constant — residualizing
/// against (or of) a constant column would divide by ~0 (§4.D edge case).
const VARIANCE_EPS: f64 = 1e-12;

/// Minimum panel size the residual-correlation invariant is checked at
/// (§3/§8: "on any batch of ≥30 candidates").
pub const MIN_CORRELATION_BATCH: usize = 30;

/// Pairwise absolute correlation above this is an `InvariantViolation`.
pub const MAX_PAIRWISE_ABS_CORRELATION: f64 = 0.10;

fn column(panel: &[RawFactors], idx: usize) -> Vec<f64> {
    panel.iter().map(|r| r.as_ordered()[idx]).collect()
}

/// Replace non-finite cells with the column mean of the finite cells (or 0.0
/// if every cell is missing), returning the imputed column and a mask of
/// which rows were originally missing so callers can re-mark them.
fn impute_mean(col: &[f64]) -> (Vec<f64>, Vec<bool>) {
    let finite: Vec<f64> = col.iter().copied().filter(|v| v.is_finite()).collect();
    let mean = if finite.is_empty() {
        0.0
    } else {
        finite.as_slice().mean()
    };
    let mask: Vec<bool> = col.iter().map(|v| !v.is_finite()).collect();
    let imputed: Vec<f64> = col
        .iter()
        .map(|v| if v.is_finite() { *v } else { mean })
        .collect();
    (imputed, mask)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Residualize `col` (already imputed, full of finite values) against the
/// orthogonal basis built so far, via sequential Gram–Schmidt projection.
/// A zero-variance column has no meaningful direction to residualize and
/// yields an all-zero residual rather than a division by ~0.
fn residualize(col: &[f64], basis: &[Vec<f64>]) -> Vec<f64> {
    let variance = col.variance();
    if variance.abs() < VARIANCE_EPS {
        return vec![0.0; col.len()];
    }
    let mean = col.mean();
    let mut residual: Vec<f64> = col.iter().map(|v| v - mean).collect();
    for b in basis {
        let bb = dot(b, b);
        if bb.abs() < VARIANCE_EPS {
            continue;
        }
        let coeff = dot(&residual, b) / bb;
        for (r, bi) in residual.iter_mut().zip(b.iter()) {
            *r -= coeff * bi;
        }
    }
    residual
}

/// Gram–Schmidt orthogonalization of a full scan-window panel (§4.D).
///
/// `momentum_core` is copied verbatim — the momentum-protection invariant —
/// and also seeds the orthogonal basis (centered) so later columns still
/// residualize against it. The remaining four columns are residualized in
/// the fixed order `technical → volume → quality → social`, each against
/// every column that precedes it (including momentum).
///
/// NaN cells are imputed as the column mean before projection and re-marked
/// NaN on output, per row, so a missing cell never silently participates in
/// another row's projection coefficient while still being reported missing.
pub fn orthogonalize(panel: &[RawFactors]) -> Vec<OrthogonalFactors> {
    if panel.is_empty() {
        return Vec::new();
    }
    let n = panel.len();

    let momentum_raw = column(panel, 0);
    let (momentum_imputed, _momentum_mask) = impute_mean(&momentum_raw);
    let momentum_mean = momentum_imputed.as_slice().mean();
    let momentum_centered: Vec<f64> = momentum_imputed.iter().map(|v| v - momentum_mean).collect();

    let mut basis: Vec<Vec<f64>> = vec![momentum_centered];
    let mut residual_cols: Vec<Vec<f64>> = Vec::with_capacity(4);
    let mut masks: Vec<Vec<bool>> = Vec::with_capacity(4);

    for idx in 1..5 {
        let raw_col = column(panel, idx);
        let (imputed, mask) = impute_mean(&raw_col);
        let residual = residualize(&imputed, &basis);
        basis.push(residual.clone());
        residual_cols.push(residual);
        masks.push(mask);
    }

    (0..n)
        .map(|i| OrthogonalFactors {
            momentum_core: momentum_raw[i],
            technical: if masks[0][i] { f64::NAN } else { residual_cols[0][i] },
            volume: if masks[1][i] { f64::NAN } else { residual_cols[1][i] },
            quality: if masks[2][i] { f64::NAN } else { residual_cols[2][i] },
            social: if masks[3][i] { f64::NAN } else { residual_cols[3][i] },
        })
        .collect()
}

fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }
    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let mx = xs.as_slice().mean();
    let my = ys.as_slice().mean();
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..xs.len() {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx <= 0.0 || vy <= 0.0 {
        return 0.0;
    }
    cov / (vx.sqrt() * vy.sqrt())
}

/// Largest pairwise absolute correlation among the four residual columns
/// `{technical, volume, quality, social}` (§3/§8 testable guarantee).
pub fn max_pairwise_abs_correlation(factors: &[OrthogonalFactors]) -> f64 {
    let cols: Vec<Vec<f64>> = (1..5)
        .map(|idx| factors.iter().map(|f| f.as_ordered()[idx]).collect())
        .collect();
    let mut max_abs: f64 = 0.0;
    for i in 0..cols.len() {
        for j in (i + 1)..cols.len() {
            let c = pearson_correlation(&cols[i], &cols[j]).abs();
            if c > max_abs {
                max_abs = c;
            }
        }
    }
    max_abs
}

/// Verify the orthogonalizer's structural invariants for a full window's
/// batch (§7: `InvariantViolation` aborts the scan window).
///
/// - `momentum_core` must equal the raw input elementwise (protection).
/// - On batches of `≥ MIN_CORRELATION_BATCH` candidates, pairwise residual
///   correlation must stay below `MAX_PAIRWISE_ABS_CORRELATION`.
pub fn verify_batch_invariants(
    raw: &[RawFactors],
    orth: &[OrthogonalFactors],
) -> Result<(), CoreError> {
    for (r, o) in raw.iter().zip(orth.iter()) {
        let same = r.momentum_core == o.momentum_core
            || (r.momentum_core.is_nan() && o.momentum_core.is_nan());
        if !same {
            return Err(CoreError::InvariantViolation {
                detail: "momentum_core mutated by orthogonalization".to_string(),
            });
        }
    }

    if orth.len() >= MIN_CORRELATION_BATCH {
        let max_corr = max_pairwise_abs_correlation(orth);
        if max_corr >= MAX_PAIRWISE_ABS_CORRELATION {
            return Err(CoreError::InvariantViolation {
                detail: format!(
                    "residual correlation {max_corr:.4} >= {MAX_PAIRWISE_ABS_CORRELATION} on a batch of {}",
                    orth.len()
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_panel(n: usize, seed: u64) -> Vec<RawFactors> {
        let mut state = seed;
        let mut next = || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f64 / u32::MAX as f64) - 0.5
        };
        (0..n)
            .map(|_| RawFactors {
                momentum_core: next() * 10.0,
                technical: next() * 10.0,
                volume: next() * 10.0,
                quality: next() * 10.0,
                social: next() * 10.0,
            })
            .collect()
    }

    #[test]
    fn momentum_core_is_copied_verbatim() {
        let panel = synthetic_panel(40, 7);
        let orth = orthogonalize(&panel);
        for (r, o) in panel.iter().zip(orth.iter()) {
            assert_eq!(r.momentum_core, o.momentum_core);
        }
    }

    #[test]
    fn momentum_core_verbatim_holds_across_several_seeds() {
        for seed in [1, 2, 3, 42, 999] {
            let panel = synthetic_panel(35, seed);
            let orth = orthogonalize(&panel);
            for (r, o) in panel.iter().zip(orth.iter()) {
                assert_eq!(r.momentum_core, o.momentum_core);
            }
        }
    }

    #[test]
    fn zero_variance_column_yields_zero_residual() {
        let panel: Vec<RawFactors> = (0..10)
            .map(|i| RawFactors {
                momentum_core: i as f64,
                technical: 5.0, // constant column
                volume: (i as f64) * 2.0,
                quality: (i as f64) * 0.5,
                social: (i as f64) - 3.0,
            })
            .collect();
        let orth = orthogonalize(&panel);
        for o in &orth {
            assert_eq!(o.technical, 0.0);
        }
    }

    #[test]
    fn nan_cells_are_remarked_nan_on_output() {
        let mut panel = synthetic_panel(32, 11);
        panel[3].volume = f64::NAN;
        let orth = orthogonalize(&panel);
        assert!(orth[3].volume.is_nan());
        // Other rows' volume residual is unaffected by row 3's NaN.
        assert!(orth[4].volume.is_finite());
    }

    #[test]
    fn pairwise_residual_correlation_stays_below_threshold() {
        let panel = synthetic_panel(60, 123);
        let orth = orthogonalize(&panel);
        let max_corr = max_pairwise_abs_correlation(&orth);
        assert!(
            max_corr < MAX_PAIRWISE_ABS_CORRELATION,
            "max pairwise |corr| = {max_corr}"
        );
    }

    #[test]
    fn verify_batch_invariants_passes_on_clean_batch() {
        let panel = synthetic_panel(30, 55);
        let orth = orthogonalize(&panel);
        assert!(verify_batch_invariants(&panel, &orth).is_ok());
    }

    #[test]
    fn verify_batch_invariants_skips_correlation_check_below_minimum() {
        // Deliberately correlated small batch (technical == volume): would
        // fail the correlation check if it applied, but n < 30 so it's skipped.
        let panel: Vec<RawFactors> = (0..10)
            .map(|i| RawFactors {
                momentum_core: i as f64,
                technical: i as f64,
                volume: i as f64,
                quality: i as f64,
                social: i as f64,
            })
            .collect();
        let orth = orthogonalize(&panel);
        assert!(verify_batch_invariants(&panel, &orth).is_ok());
    }

    #[test]
    fn verify_batch_invariants_rejects_mutated_momentum() {
        let panel = synthetic_panel(30, 8);
        let mut orth = orthogonalize(&panel);
        orth[0].momentum_core += 1.0;
        let err = verify_batch_invariants(&panel, &orth).unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation { .. }));
    }
}
