use serde::{Deserialize, Serialize};
use std::fmt;

/// Error taxonomy (§7) shared across the pipeline.
///
/// This is not a catch-all: each fallible boundary (providers, microstructure,
/// gates, guards, orthogonalizer) returns its own narrower result type where
/// it helps the caller, and converts into this taxonomy only at the point a
/// candidate-level decision or a fatal abort needs to be recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Symbol is not USD-quoted (and not a recognized USDT proxy).
    NonUSDSymbol { symbol: String },
    /// Microstructure was requested from a source tagged as an aggregator.
    AggregatorBan { source: String },
    /// Upstream call failed after retry/backoff exhaustion.
    TransientUpstream { venue: String, detail: String },
    /// All venues were stale at evaluation time.
    StaleMicro { symbol: String },
    /// Fewer than 2 venues passed microstructure thresholds.
    InsufficientLiquidity { symbol: String, venues_passed: usize },
    /// A guard denied the candidate. Carries the guard name and reason.
    GuardDenied {
        guard: GuardName,
        reason: String,
    },
    /// A structural invariant was violated — fatal, aborts the scan window.
    InvariantViolation { detail: String },
    /// Work was cancelled by a deadline or shutdown signal.
    Cancelled { reason: String },
}

/// Which guard produced a `GuardDenied`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardName {
    Freshness,
    Fatigue,
    LateFill,
}

impl fmt::Display for GuardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuardName::Freshness => "freshness",
            GuardName::Fatigue => "fatigue",
            GuardName::LateFill => "late_fill",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::NonUSDSymbol { symbol } => write!(f, "non-USD symbol: {symbol}"),
            CoreError::AggregatorBan { source } => {
                write!(f, "aggregator source '{source}' cannot serve microstructure")
            }
            CoreError::TransientUpstream { venue, detail } => {
                write!(f, "transient upstream failure at {venue}: {detail}")
            }
            CoreError::StaleMicro { symbol } => write!(f, "all venues stale for {symbol}"),
            CoreError::InsufficientLiquidity {
                symbol,
                venues_passed,
            } => write!(
                f,
                "insufficient liquidity for {symbol}: only {venues_passed} venue(s) passed"
            ),
            CoreError::GuardDenied { guard, reason } => {
                write!(f, "guard '{guard}' denied: {reason}")
            }
            CoreError::InvariantViolation { detail } => {
                write!(f, "invariant violation: {detail}")
            }
            CoreError::Cancelled { reason } => write!(f, "cancelled: {reason}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Exit codes for the scan binary (§6).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    ConfigError = 2,
    ProviderUnavailable = 3,
    AllCandidatesSkipped = 4,
    InvariantViolation = 5,
}
