//! cryptorun-schemas
//!
//! Shared data model (§3) and error taxonomy (§7) for the CryptoRun signal
//! core. Pure types only — no IO, no scoring logic, no provider calls.

mod candidate;
mod error;
mod exit;
mod factors;
mod guard;
mod micro;
mod regime;
mod score;

pub use candidate::*;
pub use error::*;
pub use exit::*;
pub use factors::*;
pub use guard::*;
pub use micro::*;
pub use regime::*;
pub use score::*;
