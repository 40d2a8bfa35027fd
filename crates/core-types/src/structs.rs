use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A discrete calendar event whose market reaction is being studied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The requested event date (ISO-8601, e.g. "2020-03-16"). It does not need to
    /// be a trading day; the aligner snaps it to the nearest one.
    pub date: NaiveDate,
    pub label: String,
}

impl Event {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

/// Number of trading rows to keep on either side of the anchor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub pre_window: usize,
    pub post_window: usize,
}

/// Pre- and post-event returns of one asset, measured against the visible boundary rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPair {
    /// Return from the first visible row to the anchor.
    pub pre_return: f64,
    /// Return from the anchor to the last visible row.
    pub post_return: f64,
}

/// Per-ticker return pairs, keyed by ticker.
pub type ReturnTable = BTreeMap<String, ReturnPair>;

/// Per-ticker market beta, keyed by ticker. A value is non-finite when the market
/// series had zero variance over the slice.
pub type Betas = BTreeMap<String, f64>;
