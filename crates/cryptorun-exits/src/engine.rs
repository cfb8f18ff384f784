use cryptorun_schemas::{ExitDecision, ExitReason, ExitState};

use crate::{ExitMarketInput, ExitThresholds};

type Trigger = (ExitReason, String);

fn check_hard_stop(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput) -> Option<Trigger> {
    let stop_price = state.entry_price - cfg.hard_stop_atr_k * market.atr;
    if market.price <= stop_price {
        return Some((
            ExitReason::HardStop,
            format!(
                "price {:.4} <= entry {:.4} - {}x ATR (stop {:.4})",
                market.price, state.entry_price, cfg.hard_stop_atr_k, stop_price
            ),
        ));
    }
    None
}

fn check_venue_health_cut(cfg: &ExitThresholds, market: &ExitMarketInput) -> Option<Trigger> {
    if market.venue_p99_ms > cfg.venue_p99_max_ms {
        return Some((
            ExitReason::VenueHealthCut,
            format!(
                "venue p99 {:.0}ms > {:.0}ms limit",
                market.venue_p99_ms, cfg.venue_p99_max_ms
            ),
        ));
    }
    if market.venue_error_rate > cfg.venue_error_rate_max {
        return Some((
            ExitReason::VenueHealthCut,
            format!(
                "venue error rate {:.2}% > {:.2}% limit",
                market.venue_error_rate * 100.0,
                cfg.venue_error_rate_max * 100.0
            ),
        ));
    }
    if market.venue_reject_rate > cfg.venue_reject_rate_max {
        return Some((
            ExitReason::VenueHealthCut,
            format!(
                "venue reject rate {:.2}% > {:.2}% limit",
                market.venue_reject_rate * 100.0,
                cfg.venue_reject_rate_max * 100.0
            ),
        ));
    }
    None
}

fn check_time_limit(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput, hours_held: f64) -> Option<Trigger> {
    let _ = state;
    if hours_held >= cfg.max_hold_hours {
        return Some((
            ExitReason::TimeLimit,
            format!("held {:.1}h >= {:.1}h max", hours_held, cfg.max_hold_hours),
        ));
    }
    let _ = market;
    None
}

fn check_acceleration_reversal(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput) -> Option<Trigger> {
    let flipped = state.entry_accel != 0.0 && market.accel_4h.signum() != state.entry_accel.signum();
    if flipped && market.accel_4h.abs() >= cfg.accel_reversal_min_magnitude {
        return Some((
            ExitReason::AccelerationReversal,
            format!(
                "4h acceleration {:.4} flipped sign vs entry {:.4}",
                market.accel_4h, state.entry_accel
            ),
        ));
    }
    None
}

fn check_momentum_fade(state: &ExitState, market: &ExitMarketInput) -> Option<Trigger> {
    let accel_not_improving = market.accel_4h <= state.entry_accel;
    if market.momentum_1h < 0.0 && market.momentum_4h < 0.0 && accel_not_improving {
        return Some((
            ExitReason::MomentumFade,
            format!(
                "1h momentum {:.4} and 4h momentum {:.4} both negative, acceleration not improving",
                market.momentum_1h, market.momentum_4h
            ),
        ));
    }
    None
}

/// §9 design note: a trailing stop is deferred while the move is still
/// accelerating, defined as current 4h acceleration positive and not more
/// than 25% below the acceleration measured at entry.
fn still_accelerating(state: &ExitState, market: &ExitMarketInput) -> bool {
    market.accel_4h > 0.0 && market.accel_4h >= state.entry_accel * 0.75
}

fn check_trailing_stop(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput) -> Option<Trigger> {
    if still_accelerating(state, market) {
        return None;
    }
    let stop_price = state.high_water_mark - cfg.trailing_atr_m * market.atr;
    if market.price <= stop_price {
        return Some((
            ExitReason::TrailingStop,
            format!(
                "price {:.4} <= HWM {:.4} - {}x ATR (stop {:.4})",
                market.price, state.high_water_mark, cfg.trailing_atr_m, stop_price
            ),
        ));
    }
    None
}

/// Highest profit-target level (1, 2, or 3) currently satisfied by price,
/// or `None` if price has not reached T1.
fn satisfied_target_level(cfg: &ExitThresholds, state: &ExitState, price: f64) -> Option<u8> {
    let ratio = price / state.entry_price - 1.0;
    if ratio >= cfg.profit_target_t3_pct {
        Some(3)
    } else if ratio >= cfg.profit_target_t2_pct {
        Some(2)
    } else if ratio >= cfg.profit_target_t1_pct {
        Some(1)
    } else {
        None
    }
}

fn highest_hit_level(state: &ExitState) -> u8 {
    if state.profit_targets_hit.t3 {
        3
    } else if state.profit_targets_hit.t2 {
        2
    } else if state.profit_targets_hit.t1 {
        1
    } else {
        0
    }
}

fn check_profit_target(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput) -> Option<Trigger> {
    let satisfied = satisfied_target_level(cfg, state, market.price)?;
    if satisfied <= highest_hit_level(state) {
        return None;
    }
    let pct = match satisfied {
        1 => cfg.profit_target_t1_pct,
        2 => cfg.profit_target_t2_pct,
        _ => cfg.profit_target_t3_pct,
    };
    Some((
        ExitReason::ProfitTarget,
        format!("price reached T{satisfied} target (+{:.0}%)", pct * 100.0),
    ))
}

/// Evaluates the exit precedence chain in fixed order, returning the
/// highest-priority trigger that fires (§4.H). Callers must update
/// [`ExitState::update_hwm`] before calling this, and must call
/// [`record_profit_target`] after acting on a `ProfitTarget` exit so a later
/// pullback doesn't re-trigger a lower target.
pub fn evaluate_exits(cfg: &ExitThresholds, state: &ExitState, market: &ExitMarketInput) -> ExitDecision {
    let hours_held = (market.now_ts - state.entry_time) as f64 / 3_600_000.0;
    let unrealized_pnl_pct = (market.price / state.entry_price - 1.0) * 100.0;

    let trigger = check_hard_stop(cfg, state, market)
        .or_else(|| check_venue_health_cut(cfg, market))
        .or_else(|| check_time_limit(cfg, state, market, hours_held))
        .or_else(|| check_acceleration_reversal(cfg, state, market))
        .or_else(|| check_momentum_fade(state, market))
        .or_else(|| check_trailing_stop(cfg, state, market))
        .or_else(|| check_profit_target(cfg, state, market));

    match trigger {
        Some((reason, description)) => ExitDecision {
            should_exit: true,
            exit_reason: Some(reason),
            trigger_description: description,
            unrealized_pnl_pct,
            hours_held,
        },
        None => ExitDecision {
            should_exit: false,
            exit_reason: None,
            trigger_description: "no exit trigger fired".to_string(),
            unrealized_pnl_pct,
            hours_held,
        },
    }
}

/// Marks the given profit-target level (1, 2, or 3) as hit so a later
/// pullback below it doesn't re-fire a lower target. Call after the decision
/// from [`evaluate_exits`] reports `ExitReason::ProfitTarget`.
pub fn record_profit_target(state: &mut ExitState, level: u8) {
    match level {
        1 => state.profit_targets_hit.t1 = true,
        2 => {
            state.profit_targets_hit.t1 = true;
            state.profit_targets_hit.t2 = true;
        }
        _ => {
            state.profit_targets_hit.t1 = true;
            state.profit_targets_hit.t2 = true;
            state.profit_targets_hit.t3 = true;
        }
    }
}
