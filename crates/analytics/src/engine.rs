use crate::drawdown::{max_drawdown, recovery_days};
use crate::error::AnalyticsError;
use crate::report::{Metric, MetricGap, SummaryRow, SummaryTable};
use crate::volatility::post_event_volatility;
use core_types::{Betas, EventWindow, NormalizedWindow, RecoveryDays, ReturnTable};

/// A stateless calculator that joins the per-metric results of one slice into a
/// [`SummaryTable`].
///
/// The ticker list and market ticker are fixed at construction; the market
/// series is used for betas upstream but never gets a summary row.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    tickers: Vec<String>,
    market_ticker: String,
}

impl AnalyticsEngine {
    pub fn new(tickers: &[String], market_ticker: impl Into<String>) -> Self {
        let market_ticker = market_ticker.into();
        let tickers = tickers
            .iter()
            .filter(|t| **t != market_ticker)
            .cloned()
            .collect();
        Self {
            tickers,
            market_ticker,
        }
    }

    /// The non-market tickers, in configured order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn market_ticker(&self) -> &str {
        &self.market_ticker
    }

    /// Builds one row per non-market ticker present in `returns`.
    ///
    /// # Arguments
    ///
    /// * `returns` - Boundary-row returns of the slice. Tickers missing here get no row.
    /// * `betas` - Market betas of the slice. A missing entry becomes `NaN`.
    /// * `norm` - The normalized slice; drawdown and recovery use all of its rows.
    /// * `raw` - The raw slice; volatility uses its rows from the anchor onwards.
    pub fn build_summary(
        &self,
        returns: &ReturnTable,
        betas: &Betas,
        norm: &NormalizedWindow,
        raw: &EventWindow,
    ) -> SummaryTable {
        let mut table = SummaryTable::default();

        let drawdowns = max_drawdown(norm);
        let recoveries = recovery_days(norm);
        let volatility = match post_event_volatility(raw) {
            Ok(volatility) => volatility,
            Err(AnalyticsError::InsufficientWindow { found, .. }) => {
                tracing::warn!(
                    post_anchor_rows = found,
                    "Not enough post-event rows for volatility in this slice."
                );
                table.skipped.push(Metric::Volatility);
                Default::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Volatility could not be computed.");
                table.skipped.push(Metric::Volatility);
                Default::default()
            }
        };

        for ticker in self.tickers.iter().filter(|t| returns.contains_key(*t)) {
            let pair = &returns[ticker];
            table.rows.push(SummaryRow {
                ticker: ticker.clone(),
                pre_return: pair.pre_return,
                post_return: pair.post_return,
                max_drawdown: drawdowns.get(ticker).copied().unwrap_or(f64::NAN),
                volatility: volatility.get(ticker).copied().unwrap_or(f64::NAN),
                days_to_recovery: recoveries
                    .get(ticker)
                    .copied()
                    .unwrap_or(RecoveryDays::Unbounded),
                beta: betas.get(ticker).copied().unwrap_or(f64::NAN),
            });
        }

        for row in &table.rows {
            for metric in row.unmeasured() {
                if table.skipped.contains(&metric) {
                    continue;
                }
                tracing::warn!(ticker = %row.ticker, %metric, "Metric could not be measured.");
                table.gaps.push(MetricGap {
                    ticker: row.ticker.clone(),
                    metric,
                });
            }
        }

        tracing::debug!(
            rows = table.len(),
            skipped = ?table.skipped,
            gaps = table.gaps.len(),
            "Summary built."
        );
        table
    }
}
