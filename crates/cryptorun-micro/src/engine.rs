use crate::VenueSnapshot;
use cryptorun_schemas::{CoreError, MicroThresholds, MicrostructureResult, VenueMicro};

/// Turn one venue's raw book/flow snapshot into its threshold verdict (§4.B).
///
/// Staleness is folded into `passed` here rather than filtered upstream, so a
/// stale venue still appears in the attribution with `passed=false` — the
/// consensus step is what decides whether a stale venue is excluded outright.
pub fn evaluate_venue(thresholds: &MicroThresholds, snap: &VenueSnapshot) -> VenueMicro {
    let mid = (snap.bid + snap.ask) / 2.0;
    let spread_bps = if mid > 0.0 {
        (snap.ask - snap.bid) / mid * 10_000.0
    } else {
        f64::INFINITY
    };
    let liquidity_gradient = if snap.depth_2pct_usd > 0.0 {
        snap.depth_half_pct_usd / snap.depth_2pct_usd
    } else {
        0.0
    };
    let fresh = snap.data_age_secs <= thresholds.stale_after_secs;
    let passed = fresh
        && spread_bps <= thresholds.spread_bps_max
        && snap.depth_2pct_usd >= thresholds.depth_usd_min
        && snap.vadr >= thresholds.vadr_min;

    VenueMicro {
        venue: snap.venue,
        spread_bps,
        mid_price: mid,
        depth_usd: snap.depth_2pct_usd,
        vadr: snap.vadr,
        liquidity_gradient,
        data_age_secs: snap.data_age_secs,
        passed,
    }
}

/// Consensus across per-venue verdicts for one symbol (§4.B).
///
/// Stale venues (`data_age_secs > stale_after_secs`) are excluded before
/// counting passes. If every venue is stale the failure is `StaleMicro`;
/// otherwise fewer than `consensus_min_venues` passes is
/// `InsufficientLiquidity`. A further agreement check requires the passing
/// venues' spreads to sit within `consensus_band_bps` of one another — a
/// wide spread disagreement is itself a liquidity red flag even when the
/// individual per-venue thresholds were each satisfied.
pub fn evaluate_consensus(
    thresholds: &MicroThresholds,
    symbol: &str,
    venues: &[VenueMicro],
) -> Result<MicrostructureResult, CoreError> {
    let fresh: Vec<&VenueMicro> = venues
        .iter()
        .filter(|v| v.data_age_secs <= thresholds.stale_after_secs)
        .collect();

    if fresh.is_empty() {
        return Err(CoreError::StaleMicro {
            symbol: symbol.to_string(),
        });
    }

    let passing: Vec<&VenueMicro> = fresh.iter().copied().filter(|v| v.passed).collect();

    let agree = passing.len() >= 2 && within_band(&passing, thresholds.consensus_band_bps);

    if passing.len() < thresholds.consensus_min_venues || !agree {
        return Err(CoreError::InsufficientLiquidity {
            symbol: symbol.to_string(),
            venues_passed: passing.len(),
        });
    }

    let n = passing.len() as f64;
    let spread_bps = passing.iter().map(|v| v.spread_bps).sum::<f64>() / n;
    let depth_usd = passing.iter().map(|v| v.depth_usd).sum::<f64>() / n;
    let vadr = passing.iter().map(|v| v.vadr).sum::<f64>() / n;
    let liquidity_gradient = passing.iter().map(|v| v.liquidity_gradient).sum::<f64>() / n;
    let venues_used = passing.iter().map(|v| v.venue).collect();

    Ok(MicrostructureResult {
        spread_bps,
        depth_usd,
        vadr,
        liquidity_gradient,
        venues_used,
        passed: true,
        reason: describe(&fresh),
    })
}

fn within_band(passing: &[&VenueMicro], band_bps: f64) -> bool {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in passing {
        min = min.min(v.spread_bps);
        max = max.max(v.spread_bps);
    }
    (max - min) <= band_bps
}

fn describe(venues: &[&VenueMicro]) -> String {
    venues
        .iter()
        .map(|v| {
            format!(
                "{}: spread={:.1}bps depth=${:.0} vadr={:.2} passed={}",
                v.venue, v.spread_bps, v.depth_usd, v.vadr, v.passed
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
