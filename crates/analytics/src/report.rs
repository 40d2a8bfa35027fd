use core_types::RecoveryDays;
use serde::Serialize;
use std::fmt;

/// A metric that can be skipped when a slice is too small to support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Returns,
    Beta,
    Volatility,
    Drawdown,
}

impl SummaryRow {
    /// Metrics of this row that hold no finite value.
    pub fn unmeasured(&self) -> Vec<Metric> {
        let mut missing = Vec::new();
        if !self.pre_return.is_finite() || !self.post_return.is_finite() {
            missing.push(Metric::Returns);
        }
        if !self.beta.is_finite() {
            missing.push(Metric::Beta);
        }
        if !self.volatility.is_finite() {
            missing.push(Metric::Volatility);
        }
        if !self.max_drawdown.is_finite() {
            missing.push(Metric::Drawdown);
        }
        missing
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Returns => "returns",
            Metric::Beta => "beta",
            Metric::Volatility => "volatility",
            Metric::Drawdown => "drawdown",
        };
        f.write_str(name)
    }
}

/// All event-study metrics for one non-market asset over one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub ticker: String,
    /// First visible row -> anchor.
    pub pre_return: f64,
    /// Anchor -> last visible row.
    pub post_return: f64,
    /// `1 - min` over the whole visible normalized slice.
    pub max_drawdown: f64,
    /// Sample deviation of post-anchor daily returns.
    pub volatility: f64,
    pub days_to_recovery: RecoveryDays,
    pub beta: f64,
}

/// One cell of the summary that holds no finite value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricGap {
    pub ticker: String,
    pub metric: Metric,
}

/// The per-asset summary of a slice, in configured ticker order.
///
/// Metrics listed in `skipped` could not be computed for this slice; their
/// column holds `NaN` in every row. `gaps` lists the remaining non-finite cells,
/// usually a ticker with too few prices in the slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
    pub skipped: Vec<Metric>,
    pub gaps: Vec<MetricGap>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, ticker: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.ticker == ticker)
    }

    /// True when no metric was skipped and every cell holds a finite value.
    pub fn is_fully_measured(&self) -> bool {
        self.skipped.is_empty() && self.gaps.is_empty()
    }
}
