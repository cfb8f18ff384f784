use crate::{QualityInputs, TechnicalInputs, VolumeInputs};
use cryptorun_providers::FundingRate;
use cryptorun_schemas::{CatalystCompression, MomentumProfile, MomentumWeights, RawFactors};

/// RSI(14)/ADX(14)/Hurst persistence composite, scaled to roughly `[-50, 50]`
/// so it sits on the same order of magnitude as the other raw factors before
/// orthogonalization. Weighting is 0.4 RSI / 0.3 ADX / 0.3 persistence; see
/// DESIGN.md for the rationale.
pub fn technical_composite(inputs: &TechnicalInputs) -> f64 {
    if !inputs.rsi_14.is_finite() || !inputs.adx_14.is_finite() || !inputs.hurst_persistence.is_finite() {
        return f64::NAN;
    }
    let rsi_signal = inputs.rsi_14 - 50.0;
    let adx_signal = (inputs.adx_14 / 100.0) * 50.0;
    let hurst_signal = (inputs.hurst_persistence - 0.5) * 100.0;
    0.4 * rsi_signal + 0.3 * adx_signal + 0.3 * hurst_signal
}

/// 24h volume vs 30-day baseline, z-scored. Zero/negative baseline stddev
/// means insufficient history, which is "missing" rather than a divide error.
pub fn volume_zscore(inputs: &VolumeInputs) -> f64 {
    if inputs.baseline_stddev_30d <= 0.0 {
        return f64::NAN;
    }
    (inputs.volume_24h - inputs.baseline_mean_30d) / inputs.baseline_stddev_30d
}

/// Stability/liquidity composite: higher is better (persistent depth, stable
/// spread), scaled to `[0, 100]`.
pub fn quality_composite(inputs: &QualityInputs) -> f64 {
    if !inputs.spread_stability.is_finite() || !inputs.depth_persistence.is_finite() {
        return f64::NAN;
    }
    let stability = (1.0 - inputs.spread_stability.clamp(0.0, 1.0)) * 100.0;
    let persistence = inputs.depth_persistence.clamp(0.0, 1.0) * 100.0;
    0.5 * stability + 0.5 * persistence
}

/// Assembles the raw factor panel for one candidate from cached provider
/// snapshots and derived inputs (§4.C). Any missing sub-input naturally
/// propagates as `NaN` through to the corresponding `RawFactors` field.
#[allow(clippy::too_many_arguments)]
pub fn extract_raw_factors(
    momentum: &MomentumProfile,
    momentum_weights: &MomentumWeights,
    technical: &TechnicalInputs,
    volume: &VolumeInputs,
    quality: &QualityInputs,
    social_raw: f64,
) -> RawFactors {
    RawFactors {
        momentum_core: momentum.blend(momentum_weights),
        technical: technical_composite(technical),
        volume: volume_zscore(volume),
        quality: quality_composite(quality),
        social: social_raw,
    }
}

/// `true` when a symbol's live funding rate diverges materially from the
/// predicted rate, feeding the entry gate's `funding_divergence` check
/// (§4.F). `threshold` is expressed in the same units as `FundingRate::rate`.
pub fn funding_divergence(funding: &FundingRate, threshold: f64) -> bool {
    funding.diverges(threshold)
}

/// Catalyst compression score, computed independently of the orthogonalized
/// panel and fed to the regime weighter's `catalyst_block` directly (§4.C).
pub fn catalyst_score(compression: &CatalystCompression) -> f64 {
    compression.score()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_composite_is_neutral_at_midpoints() {
        let t = technical_composite(&TechnicalInputs {
            rsi_14: 50.0,
            adx_14: 0.0,
            hurst_persistence: 0.5,
        });
        assert_eq!(t, 0.0);
    }

    #[test]
    fn technical_composite_missing_propagates_nan() {
        let t = technical_composite(&TechnicalInputs {
            rsi_14: f64::NAN,
            adx_14: 20.0,
            hurst_persistence: 0.5,
        });
        assert!(t.is_nan());
    }

    #[test]
    fn volume_zscore_above_baseline_is_positive() {
        let z = volume_zscore(&VolumeInputs {
            volume_24h: 1_500_000.0,
            baseline_mean_30d: 1_000_000.0,
            baseline_stddev_30d: 250_000.0,
        });
        assert_eq!(z, 2.0);
    }

    #[test]
    fn volume_zscore_zero_stddev_is_missing() {
        let z = volume_zscore(&VolumeInputs {
            volume_24h: 1_000_000.0,
            baseline_mean_30d: 1_000_000.0,
            baseline_stddev_30d: 0.0,
        });
        assert!(z.is_nan());
    }

    #[test]
    fn quality_composite_perfect_scores_max() {
        let q = quality_composite(&QualityInputs {
            spread_stability: 0.0,
            depth_persistence: 1.0,
        });
        assert_eq!(q, 100.0);
    }

    #[test]
    fn extract_raw_factors_assembles_all_five_dims() {
        let momentum = MomentumProfile {
            ret_1h: 0.01,
            ret_4h: 0.02,
            ret_12h: 0.03,
            ret_24h: 0.05,
            ret_7d: None,
        };
        let weights = MomentumWeights {
            w_1h: 0.1,
            w_4h: 0.2,
            w_12h: 0.3,
            w_24h: 0.4,
            w_7d: 0.0,
        };
        let raw = extract_raw_factors(
            &momentum,
            &weights,
            &TechnicalInputs {
                rsi_14: 60.0,
                adx_14: 25.0,
                hurst_persistence: 0.6,
            },
            &VolumeInputs {
                volume_24h: 2_000_000.0,
                baseline_mean_30d: 1_000_000.0,
                baseline_stddev_30d: 500_000.0,
            },
            &QualityInputs {
                spread_stability: 0.2,
                depth_persistence: 0.8,
            },
            3.5,
        );
        assert!(raw.momentum_core.is_finite());
        assert!(raw.technical.is_finite());
        assert!(raw.volume.is_finite());
        assert!(raw.quality.is_finite());
        assert_eq!(raw.social, 3.5);
    }

    #[test]
    fn funding_divergence_detects_material_gap() {
        let f = FundingRate {
            rate: 0.01,
            predicted_rate: 0.002,
            ts_ms: 0,
        };
        assert!(funding_divergence(&f, 0.005));
        assert!(!funding_divergence(&f, 0.02));
    }
}
