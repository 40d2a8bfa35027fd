//! # Aftershock Analytics Engine
//!
//! This crate turns a table of closing prices into event-study metrics: it snaps a
//! requested event date to a trading day, carves and normalizes a window around
//! it, and measures returns, drawdown, recovery and volatility.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes a window (or any zoomed slice of
//!   one) and returns fresh values. Calling it again on the same slice gives the same
//!   answer, so a presentation layer can re-run it on every zoom change.
//!
//! ## Public API
//!
//! - `aligner`, `normalizer`, `returns`, `drawdown`, `volatility`: the per-metric functions.
//! - `AnalyticsEngine`: joins the metrics into a `SummaryTable`, excluding the market series.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aligner;
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod report;
pub mod returns;
pub mod volatility;

// Re-export the key components to create a clean, public-facing API.
pub use aligner::{align, build_window, locate_anchor};
pub use drawdown::{max_drawdown, recovery_days};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use normalizer::normalize;
pub use report::{Metric, MetricGap, SummaryRow, SummaryTable};
pub use volatility::post_event_volatility;
