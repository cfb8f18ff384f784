/// Technical sub-indicators feeding the `technical` raw factor (§4.C).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TechnicalInputs {
    pub rsi_14: f64,
    pub adx_14: f64,
    /// Hurst-like persistence estimate in `[0, 1]`; > 0.5 trending, < 0.5
    /// mean-reverting.
    pub hurst_persistence: f64,
}

/// Volume inputs feeding the `volume` raw factor's 24h-vs-30d z-score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeInputs {
    pub volume_24h: f64,
    pub baseline_mean_30d: f64,
    pub baseline_stddev_30d: f64,
}

/// Stability/liquidity inputs feeding the `quality` raw factor (§4.C).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityInputs {
    /// Coefficient of variation of spread over the lookback window, in
    /// `[0, 1]`; 0 = perfectly stable spread.
    pub spread_stability: f64,
    /// Fraction of the lookback window depth stayed above the liquidity
    /// floor, in `[0, 1]`; 1 = always sufficiently deep.
    pub depth_persistence: f64,
}

/// Everything the factor extractor produces for one candidate (§4.C).
///
/// `raw` feeds the orthogonalizer; `catalyst_score` feeds the regime
/// weighter's `catalyst_block` directly (it is never orthogonalized — see
/// §4.C/§4.E); `funding_divergence` feeds the entry gate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FactorSnapshot {
    pub raw: cryptorun_schemas::RawFactors,
    pub catalyst_score: f64,
    pub funding_divergence: bool,
}
