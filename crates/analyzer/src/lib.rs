//! # Aftershock Analyzer
//!
//! Turns a slice's `SummaryTable` into plain-language picks for three investor
//! profiles. It ranks; it never re-measures.

use analytics::{SummaryRow, SummaryTable};
use serde::Serialize;
use std::cmp::Ordering;

/// Investor-style picks for one slice, with the reasoning behind each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSet {
    /// Lowest post-event volatility.
    pub defensive: Option<String>,
    /// Highest post-event return. `None` only for an empty summary.
    pub growth: Option<String>,
    /// Smallest finite days-to-recovery.
    pub fastest_recovery: Option<String>,
    /// Number of assets that were ranked.
    pub ranked: usize,
    pub rationale: Vec<String>,
}

impl RecommendationSet {
    /// Builds the rationale lines, naming each pick through `label`.
    ///
    /// `rationale` holds the same lines with plain tickers.
    pub fn describe<F>(&self, label: F) -> Vec<String>
    where
        F: Fn(&str) -> String,
    {
        if self.ranked == 0 {
            return vec!["No strategy summary available in this window.".to_string()];
        }

        let defensive = match &self.defensive {
            Some(ticker) => format!(
                "Defensive investor: consider {} (lowest post-event volatility in this window).",
                label(ticker.as_str())
            ),
            None => "Defensive investor: volatility could not be measured in this window."
                .to_string(),
        };
        let growth = match &self.growth {
            Some(ticker) => format!(
                "Growth-seeking investor: consider {} (highest post-event return in this window).",
                label(ticker.as_str())
            ),
            None => "Growth-seeking investor: post-event returns are unavailable in this window."
                .to_string(),
        };
        let recovery = match &self.fastest_recovery {
            Some(ticker) => format!(
                "Focused on quick recovery: consider {} (fastest recovery to pre-event level in this window).",
                label(ticker.as_str())
            ),
            None => "No asset fully recovered to its pre-event level within this window.".to_string(),
        };
        vec![defensive, growth, recovery]
    }
}

/// The recommendation engine.
#[derive(Debug, Default, Clone)]
pub struct Recommender {}

impl Recommender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks the assets of `summary` for each investor profile.
    ///
    /// Ties go to the asset listed first. `NaN` metrics never win a ranking.
    pub fn recommend(&self, summary: &SummaryTable) -> RecommendationSet {
        let mut set = RecommendationSet {
            ranked: summary.len(),
            ..Default::default()
        };

        if !summary.is_empty() {
            // Defensive: lowest post-event volatility
            set.defensive = best_by(&summary.rows, |r| r.volatility, Ordering::Less);
            // Growth / momentum: highest post-event return
            set.growth = best_by(&summary.rows, |r| r.post_return, Ordering::Greater);
            // Fastest recovery: smallest finite days_to_recovery
            set.fastest_recovery = summary
                .rows
                .iter()
                .filter_map(|r| r.days_to_recovery.days().map(|days| (days, r)))
                .min_by_key(|(days, _)| *days)
                .map(|(_, r)| r.ticker.clone());
        }
        set.rationale = set.describe(|ticker| ticker.to_string());

        tracing::debug!(
            defensive = ?set.defensive,
            growth = ?set.growth,
            fastest_recovery = ?set.fastest_recovery,
            "Recommendations derived."
        );
        set
    }
}

/// The ticker whose metric is most `wanted` (Less = smallest, Greater = largest),
/// ignoring rows where the metric is `NaN`. The first row wins a tie.
fn best_by<F>(rows: &[SummaryRow], metric: F, wanted: Ordering) -> Option<String>
where
    F: Fn(&SummaryRow) -> f64,
{
    rows.iter()
        .filter(|r| !metric(*r).is_nan())
        .fold(None::<&SummaryRow>, |best, row| match best {
            Some(current) if metric(row).partial_cmp(&metric(current)) != Some(wanted) => {
                Some(current)
            }
            _ => Some(row),
        })
        .map(|r| r.ticker.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Metric;
    use core_types::RecoveryDays;

    fn row(ticker: &str, post_return: f64, volatility: f64, recovery: RecoveryDays) -> SummaryRow {
        SummaryRow {
            ticker: ticker.to_string(),
            pre_return: 0.0,
            post_return,
            max_drawdown: 0.1,
            volatility,
            days_to_recovery: recovery,
            beta: 1.0,
        }
    }

    fn table(rows: Vec<SummaryRow>) -> SummaryTable {
        SummaryTable {
            rows,
            ..Default::default()
        }
    }

    #[test]
    fn picks_exact_argmin_and_argmax() {
        let summary = table(vec![
            row("XLE", 0.05, 0.030, RecoveryDays::Recovered(40)),
            row("XLK", 0.25, 0.020, RecoveryDays::Recovered(90)),
            row("XLF", -0.10, 0.025, RecoveryDays::Recovered(12)),
        ]);
        let set = Recommender::new().recommend(&summary);
        assert_eq!(set.defensive.as_deref(), Some("XLK"));
        assert_eq!(set.growth.as_deref(), Some("XLK"));
        assert_eq!(set.fastest_recovery.as_deref(), Some("XLF"));
        assert_eq!(set.rationale.len(), 3);
    }

    #[test]
    fn no_finite_recovery_gives_null_with_explanation() {
        let summary = table(vec![
            row("XLE", 0.05, 0.030, RecoveryDays::Unbounded),
            row("XLK", 0.25, 0.020, RecoveryDays::Unbounded),
        ]);
        let set = Recommender::new().recommend(&summary);
        assert_eq!(set.fastest_recovery, None);
        assert_eq!(set.defensive.as_deref(), Some("XLK"));
        assert_eq!(set.growth.as_deref(), Some("XLK"));
        assert!(set
            .rationale
            .iter()
            .any(|line| line.contains("No asset fully recovered")));
    }

    #[test]
    fn empty_summary_gives_empty_set() {
        let set = Recommender::new().recommend(&SummaryTable::default());
        assert_eq!(set.defensive, None);
        assert_eq!(set.growth, None);
        assert_eq!(set.fastest_recovery, None);
        assert_eq!(set.rationale.len(), 1);
    }

    #[test]
    fn nan_metrics_never_win() {
        let summary = SummaryTable {
            rows: vec![
                row("XLE", f64::NAN, f64::NAN, RecoveryDays::Unbounded),
                row("XLK", 0.01, f64::NAN, RecoveryDays::Unbounded),
            ],
            skipped: vec![Metric::Volatility],
            gaps: vec![],
        };
        let set = Recommender::new().recommend(&summary);
        assert_eq!(set.defensive, None);
        assert_eq!(set.growth.as_deref(), Some("XLK"));
    }

    #[test]
    fn ties_go_to_the_first_listed_asset() {
        let summary = table(vec![
            row("XLE", 0.1, 0.02, RecoveryDays::Recovered(5)),
            row("XLK", 0.1, 0.02, RecoveryDays::Recovered(5)),
        ]);
        let set = Recommender::new().recommend(&summary);
        assert_eq!(set.defensive.as_deref(), Some("XLE"));
        assert_eq!(set.growth.as_deref(), Some("XLE"));
        assert_eq!(set.fastest_recovery.as_deref(), Some("XLE"));
    }

    #[test]
    fn describe_names_picks_with_the_given_labels() {
        let summary = table(vec![
            row("XLE", 0.05, 0.030, RecoveryDays::Recovered(40)),
            // The ticker also appears inside the other asset's label.
            row("XL", 0.25, 0.020, RecoveryDays::Unbounded),
        ]);
        let set = Recommender::new().recommend(&summary);
        let lines = set.describe(|ticker| match ticker {
            "XL" => "Tech (not XLE)".to_string(),
            "XLE" => "Energy".to_string(),
            other => other.to_string(),
        });
        assert_eq!(
            lines[0],
            "Defensive investor: consider Tech (not XLE) (lowest post-event volatility in this window)."
        );
        assert!(lines[1].contains("consider Tech (not XLE) "));
        assert!(lines[2].contains("consider Energy "));
        // The stored rationale keeps plain tickers.
        assert!(set.rationale[2].contains("consider XLE "));
    }
}
