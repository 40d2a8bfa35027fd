//! # Aftershock Engine
//!
//! The orchestrator of an event study. It wires the aligner, normalizer, metric
//! calculators, risk model and recommender together, and exposes the whole
//! analysis of a slice as a pure function of `(prepared window, zoom)`.
//!
//! A presentation layer calls [`EventStudy::prepare`] once per event and then
//! [`EventStudy::analyze_zoom`] as often as the user changes the zoom. The
//! multi-event runner [`EventStudy::run`] does both for every configured event
//! and preset, isolating per-event failures.

pub mod error;
pub mod report;
pub mod study;

pub use error::EngineError;
pub use report::{EventOutcome, EventReport, StudyReport, ZoomReport};
pub use study::{EventStudy, PreparedEvent};
