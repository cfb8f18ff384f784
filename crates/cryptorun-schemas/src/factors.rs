use serde::{Deserialize, Serialize};

/// Multi-timeframe momentum sub-profile feeding `RawFactors::momentum_core`.
///
/// Kept as distinct fields rather than collapsed into a single "24h" bucket;
/// see DESIGN.md.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumProfile {
    pub ret_1h: f64,
    pub ret_4h: f64,
    pub ret_12h: f64,
    pub ret_24h: f64,
    /// `None` when no 7d historical close is cached (§9 Open Question 3):
    /// never synthesized from a same-day open-price proxy.
    pub ret_7d: Option<f64>,
}

/// Weights applied to `MomentumProfile` legs to produce `momentum_core`.
/// Sourced from the regime weighter's momentum sub-profile (§4.C).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MomentumWeights {
    pub w_1h: f64,
    pub w_4h: f64,
    pub w_12h: f64,
    pub w_24h: f64,
    pub w_7d: f64,
}

impl MomentumProfile {
    /// Weighted blend of available legs. A leg with `ret_7d = None` drops out
    /// of both the numerator and the weight-sum renormalization, so a missing
    /// 7d leg never silently zeroes the blend.
    pub fn blend(&self, w: &MomentumWeights) -> f64 {
        let mut num = self.ret_1h * w.w_1h
            + self.ret_4h * w.w_4h
            + self.ret_12h * w.w_12h
            + self.ret_24h * w.w_24h;
        let mut denom = w.w_1h + w.w_4h + w.w_12h + w.w_24h;
        if let Some(ret_7d) = self.ret_7d {
            num += ret_7d * w.w_7d;
            denom += w.w_7d;
        }
        if denom <= 0.0 {
            return f64::NAN;
        }
        num / denom
    }
}

/// Catalyst compression sub-factor (§4.C): squeeze + event proximity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalystCompression {
    /// Bollinger-bandwidth vs Keltner-channel-width ratio; < 1.0 = squeeze.
    pub bb_keltner_ratio: f64,
    /// 0 (no scheduled event nearby) .. 1 (event imminent).
    pub event_proximity_weight: f64,
}

impl CatalystCompression {
    /// Higher when squeezed (ratio < 1) and an event is near.
    pub fn score(&self) -> f64 {
        let squeeze = (1.0 - self.bb_keltner_ratio).max(0.0);
        squeeze * (0.5 + 0.5 * self.event_proximity_weight)
    }
}

/// Raw, pre-orthogonalization factor panel for one candidate (§3).
///
/// Any field may be `NaN`/non-finite to mean "missing, skip orthogonalization
/// of this dimension" — see [`RawFactors::is_missing`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawFactors {
    pub momentum_core: f64,
    pub technical: f64,
    pub volume: f64,
    pub quality: f64,
    pub social: f64,
}

impl RawFactors {
    pub fn is_missing(x: f64) -> bool {
        !x.is_finite()
    }

    /// The five dimensions in the fixed residualization order (§3/§4.D).
    pub fn as_ordered(&self) -> [f64; 5] {
        [
            self.momentum_core,
            self.technical,
            self.volume,
            self.quality,
            self.social,
        ]
    }

    pub fn from_ordered(v: [f64; 5]) -> Self {
        Self {
            momentum_core: v[0],
            technical: v[1],
            volume: v[2],
            quality: v[3],
            social: v[4],
        }
    }
}

/// Post-orthogonalization factor panel (§3/§4.D).
///
/// `momentum_core` is copied verbatim from `RawFactors` — the "momentum
/// protection" invariant. The remaining four fields are Gram–Schmidt
/// residuals against the preceding columns in fixed order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrthogonalFactors {
    pub momentum_core: f64,
    pub technical: f64,
    pub volume: f64,
    pub quality: f64,
    pub social: f64,
}

impl OrthogonalFactors {
    pub fn as_ordered(&self) -> [f64; 5] {
        [
            self.momentum_core,
            self.technical,
            self.volume,
            self.quality,
            self.social,
        ]
    }

    pub fn from_ordered(v: [f64; 5]) -> Self {
        Self {
            momentum_core: v[0],
            technical: v[1],
            volume: v[2],
            quality: v[3],
            social: v[4],
        }
    }
}

/// Per-factor attribution record emitted alongside a `CompositeScore` (§4.E).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorAttribution {
    pub factor: String,
    pub raw: f64,
    pub orthogonal: f64,
    pub weight: f64,
    pub contribution: f64,
    pub interpretation: String,
}
