use analytics::SummaryTable;
use analyzer::RecommendationSet;
use chrono::NaiveDate;
use core_types::{Betas, Event, ReturnTable};
use serde::Serialize;

/// Everything computed for one zoom slice of an event window.
///
/// `summary` and `recommendations` are present only when both returns and betas
/// could be computed; `notes` explains every computation that was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomReport {
    pub label: String,
    /// Half-width asked for. `None` means the full window.
    pub requested_zoom: Option<u32>,
    /// Half-width actually used, after clamping to the window.
    pub effective_zoom: u32,
    pub visible_rows: usize,
    pub returns: Option<ReturnTable>,
    pub betas: Option<Betas>,
    pub summary: Option<SummaryTable>,
    pub recommendations: Option<RecommendationSet>,
    pub notes: Vec<String>,
}

impl ZoomReport {
    pub fn is_complete(&self) -> bool {
        self.summary.is_some() && self.notes.is_empty()
    }
}

/// The analysis of one event across all requested zoom levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub event: Event,
    /// The trading day the event was snapped to.
    pub anchor: NaiveDate,
    pub window_rows: usize,
    pub max_zoom: u32,
    pub zooms: Vec<ZoomReport>,
}

/// The result of one event: either its report or the reason it could not be analysed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventOutcome {
    Completed(EventReport),
    Failed { event: Event, error: String },
}

impl EventOutcome {
    pub fn event(&self) -> &Event {
        match self {
            EventOutcome::Completed(report) => &report.event,
            EventOutcome::Failed { event, .. } => event,
        }
    }

    pub fn report(&self) -> Option<&EventReport> {
        match self {
            EventOutcome::Completed(report) => Some(report),
            EventOutcome::Failed { .. } => None,
        }
    }
}

/// The outcome of every configured event, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyReport {
    pub market_ticker: String,
    pub outcomes: Vec<EventOutcome>,
}

impl StudyReport {
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::Failed { .. }))
            .count()
    }
}
