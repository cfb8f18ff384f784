use serde::{Deserialize, Serialize};

/// Composite score for one candidate (§3).
///
/// Invariant (enforced by construction in `CompositeScore::new`, never by the
/// caller): `final_with_social = internal_total_100 + social_capped`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub internal_total_100: f64,
    pub social_capped: f64,
    pub final_with_social: f64,
}

impl CompositeScore {
    /// Construct from an unclamped internal total and an unclamped social
    /// residual, applying both clamps from §3/§4.E and deriving the sum.
    pub fn new(internal_total_raw: f64, orth_social: f64) -> Self {
        let internal_total_100 = internal_total_raw.clamp(0.0, 100.0);
        let social_capped = orth_social.max(0.0).min(10.0);
        Self {
            internal_total_100,
            social_capped,
            final_with_social: internal_total_100 + social_capped,
        }
    }
}
