/// Measured inputs the entry gates check (§4.F).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateInput {
    pub final_with_social: f64,
    pub vadr: f64,
    pub funding_divergence: bool,
}

/// Gate thresholds (§6 config: `score_threshold`, `vadr_min`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateThresholds {
    pub score_min: f64,
    pub vadr_min: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            score_min: 75.0,
            vadr_min: 1.8,
        }
    }
}

/// Which gate blocked the candidate, if any, and the value it measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockingGate {
    Score,
    Vadr,
    FundingDivergence,
}

impl std::fmt::Display for BlockingGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BlockingGate::Score => "score",
            BlockingGate::Vadr => "vadr",
            BlockingGate::FundingDivergence => "funding_divergence",
        };
        write!(f, "{s}")
    }
}

/// Outcome of evaluating the entry gates in order (§4.F).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateResult {
    pub passed: bool,
    pub blocking_gate: Option<BlockingGate>,
    pub measured_value: Option<f64>,
}

impl GateResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            blocking_gate: None,
            measured_value: None,
        }
    }

    pub fn block(gate: BlockingGate, measured: f64) -> Self {
        Self {
            passed: false,
            blocking_gate: Some(gate),
            measured_value: Some(measured),
        }
    }
}
