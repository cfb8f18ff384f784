use cryptorun_schemas::{
    CompositeScore, FactorAttribution, OrthogonalFactors, RawFactors, RegimeWeights,
    SUPPLY_DEMAND_QUALITY_SHARE, SUPPLY_DEMAND_VOLUME_SHARE,
};

/// Regime-weighted blend of the orthogonal panel plus the directly-fed
/// catalyst score into a `CompositeScore`, with per-factor attribution
/// (§4.E).
///
/// `catalyst_score` never passes through the orthogonalizer — §4.C says it
/// "feeds the catalyst_block directly" — so it has no orthogonal-vs-raw
/// distinction; its attribution row reports the same value in both columns.
pub fn score_candidate(
    weights: &RegimeWeights,
    raw: &RawFactors,
    orth: &OrthogonalFactors,
    catalyst_score: f64,
) -> (CompositeScore, Vec<FactorAttribution>) {
    let volume_contribution =
        weights.supply_demand_block * SUPPLY_DEMAND_VOLUME_SHARE * zero_if_nan(orth.volume);
    let quality_contribution =
        weights.supply_demand_block * SUPPLY_DEMAND_QUALITY_SHARE * zero_if_nan(orth.quality);
    let momentum_contribution = weights.momentum_core * zero_if_nan(orth.momentum_core);
    let technical_contribution = weights.technical_resid * zero_if_nan(orth.technical);
    let catalyst_contribution = weights.catalyst_block * catalyst_score;

    let internal_total_raw = momentum_contribution
        + technical_contribution
        + volume_contribution
        + quality_contribution
        + catalyst_contribution;

    let score = CompositeScore::new(internal_total_raw, zero_if_nan(orth.social));

    let attribution = vec![
        FactorAttribution {
            factor: "momentum_core".to_string(),
            raw: raw.momentum_core,
            orthogonal: orth.momentum_core,
            weight: weights.momentum_core,
            contribution: momentum_contribution,
            interpretation: interpretation("momentum_core", weights.momentum_core, orth.momentum_core),
        },
        FactorAttribution {
            factor: "technical".to_string(),
            raw: raw.technical,
            orthogonal: orth.technical,
            weight: weights.technical_resid,
            contribution: technical_contribution,
            interpretation: interpretation("technical", weights.technical_resid, orth.technical),
        },
        FactorAttribution {
            factor: "volume".to_string(),
            raw: raw.volume,
            orthogonal: orth.volume,
            weight: weights.supply_demand_block * SUPPLY_DEMAND_VOLUME_SHARE,
            contribution: volume_contribution,
            interpretation: interpretation(
                "volume",
                weights.supply_demand_block * SUPPLY_DEMAND_VOLUME_SHARE,
                orth.volume,
            ),
        },
        FactorAttribution {
            factor: "quality".to_string(),
            raw: raw.quality,
            orthogonal: orth.quality,
            weight: weights.supply_demand_block * SUPPLY_DEMAND_QUALITY_SHARE,
            contribution: quality_contribution,
            interpretation: interpretation(
                "quality",
                weights.supply_demand_block * SUPPLY_DEMAND_QUALITY_SHARE,
                orth.quality,
            ),
        },
        FactorAttribution {
            factor: "catalyst".to_string(),
            raw: catalyst_score,
            orthogonal: catalyst_score,
            weight: weights.catalyst_block,
            contribution: catalyst_contribution,
            interpretation: interpretation("catalyst", weights.catalyst_block, catalyst_score),
        },
        FactorAttribution {
            factor: "social".to_string(),
            raw: raw.social,
            orthogonal: orth.social,
            weight: 1.0,
            contribution: score.social_capped,
            interpretation: format!(
                "social residual {:.2} capped to [0,10] -> {:.2}",
                orth.social, score.social_capped
            ),
        },
    ];

    (score, attribution)
}

fn zero_if_nan(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

fn interpretation(factor: &str, weight: f64, orth: f64) -> String {
    format!("{factor} weighted {weight:.3} x {orth:.3} = {:.3}", weight * orth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> RegimeWeights {
        RegimeWeights {
            momentum_core: 0.4,
            technical_resid: 0.2,
            supply_demand_block: 0.25,
            catalyst_block: 0.15,
        }
    }

    #[test]
    fn score_sums_weighted_contributions() {
        let raw = RawFactors {
            momentum_core: 50.0,
            technical: 20.0,
            volume: 10.0,
            quality: 30.0,
            social: 5.0,
        };
        let orth = OrthogonalFactors {
            momentum_core: 50.0,
            technical: 20.0,
            volume: 10.0,
            quality: 30.0,
            social: 5.0,
        };
        let (score, attrs) = score_candidate(&weights(), &raw, &orth, 40.0);

        let expected = 0.4 * 50.0 + 0.2 * 20.0 + 0.25 * (0.55 * 10.0 + 0.45 * 30.0) + 0.15 * 40.0;
        assert!((score.internal_total_100 - expected.clamp(0.0, 100.0)).abs() < 1e-9);
        assert_eq!(attrs.len(), 6);
    }

    #[test]
    fn missing_orthogonal_dimension_contributes_zero() {
        let raw = RawFactors {
            momentum_core: 50.0,
            technical: f64::NAN,
            volume: 10.0,
            quality: 30.0,
            social: 5.0,
        };
        let orth = OrthogonalFactors {
            momentum_core: 50.0,
            technical: f64::NAN,
            volume: 10.0,
            quality: 30.0,
            social: 5.0,
        };
        let (score_with_nan, _) = score_candidate(&weights(), &raw, &orth, 40.0);
        let mut orth_zeroed = orth;
        orth_zeroed.technical = 0.0;
        let (score_zeroed, _) = score_candidate(&weights(), &raw, &orth_zeroed, 40.0);
        assert_eq!(score_with_nan.internal_total_100, score_zeroed.internal_total_100);
    }

    #[test]
    fn internal_total_clamps_at_100() {
        let raw = RawFactors {
            momentum_core: 500.0,
            technical: 500.0,
            volume: 500.0,
            quality: 500.0,
            social: 0.0,
        };
        let orth = OrthogonalFactors {
            momentum_core: 500.0,
            technical: 500.0,
            volume: 500.0,
            quality: 500.0,
            social: 0.0,
        };
        let (score, _) = score_candidate(&weights(), &raw, &orth, 500.0);
        assert_eq!(score.internal_total_100, 100.0);
    }

    #[test]
    fn catalyst_attribution_has_no_raw_orthogonal_distinction() {
        let raw = RawFactors {
            momentum_core: 1.0,
            technical: 1.0,
            volume: 1.0,
            quality: 1.0,
            social: 1.0,
        };
        let orth = OrthogonalFactors {
            momentum_core: 1.0,
            technical: 1.0,
            volume: 1.0,
            quality: 1.0,
            social: 1.0,
        };
        let (_, attrs) = score_candidate(&weights(), &raw, &orth, 7.0);
        let catalyst = attrs.iter().find(|a| a.factor == "catalyst").unwrap();
        assert_eq!(catalyst.raw, catalyst.orthogonal);
        assert_eq!(catalyst.raw, 7.0);
    }
}
