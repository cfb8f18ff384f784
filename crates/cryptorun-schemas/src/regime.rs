use serde::{Deserialize, Serialize};
use std::fmt;

/// Market regime tag. Opaque per §4.E — produced by an external regime
/// detector this repo does not implement; only the seven named regimes are
/// recognized by `RegimeWeightsTable` lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Calm,
    Normal,
    Volatile,
    Choppy,
    Bull,
    Bear,
    HighVol,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Calm => "calm",
            Regime::Normal => "normal",
            Regime::Volatile => "volatile",
            Regime::Choppy => "choppy",
            Regime::Bull => "bull",
            Regime::Bear => "bear",
            Regime::HighVol => "high_vol",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "calm" => Some(Regime::Calm),
            "normal" => Some(Regime::Normal),
            "volatile" => Some(Regime::Volatile),
            "choppy" => Some(Regime::Choppy),
            "bull" => Some(Regime::Bull),
            "bear" => Some(Regime::Bear),
            "high_vol" => Some(Regime::HighVol),
            _ => None,
        }
    }

    pub const ALL: [Regime; 7] = [
        Regime::Calm,
        Regime::Normal,
        Regime::Volatile,
        Regime::Choppy,
        Regime::Bull,
        Regime::Bear,
        Regime::HighVol,
    ];
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Four non-negative weights for one regime, summing to 1.0 ± 1e-6 (§3).
///
/// `supply_demand_block` is split 0.55/0.45 into volume/quality contributions
/// by the caller (`cryptorun-regime`); the fixed split itself is not stored
/// here because it is a global constant, not a per-regime parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegimeWeights {
    pub momentum_core: f64,
    pub technical_resid: f64,
    pub supply_demand_block: f64,
    pub catalyst_block: f64,
}

/// Tolerance for the weight-sum invariant (§3/§8).
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Fixed split of `supply_demand_block` into volume/quality (§4.E).
pub const SUPPLY_DEMAND_VOLUME_SHARE: f64 = 0.55;
pub const SUPPLY_DEMAND_QUALITY_SHARE: f64 = 0.45;

impl RegimeWeights {
    pub fn sum(&self) -> f64 {
        self.momentum_core + self.technical_resid + self.supply_demand_block + self.catalyst_block
    }

    pub fn is_valid(&self) -> bool {
        self.momentum_core >= 0.0
            && self.technical_resid >= 0.0
            && self.supply_demand_block >= 0.0
            && self.catalyst_block >= 0.0
            && (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}
