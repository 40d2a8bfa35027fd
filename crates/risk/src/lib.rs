//! # Aftershock Risk
//!
//! Measures how strongly each asset moved with the market over a slice of an
//! event window. Like the analytics crate it is pure logic over `core-types`.

pub mod error;
pub mod market_beta;

pub use error::RiskError;
pub use market_beta::{beta, MarketBeta};

use core_types::{Betas, EventWindow};

/// The interface the event-study engine uses to measure market sensitivity.
///
/// Implementations receive raw prices (not normalized levels) for any slice
/// of a window and must not keep state between calls.
pub trait RiskModel: Send + Sync {
    /// Computes a sensitivity value for every non-market column of `raw`.
    fn evaluate(&self, raw: &EventWindow) -> Result<Betas, RiskError>;
}
