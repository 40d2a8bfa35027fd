use crate::error::AnalyticsError;
use core_types::EventWindow;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Sample standard deviation of daily returns from the anchor onwards.
///
/// Only rows at offset >= 0 of the raw slice are used, so the anchor row is the
/// base of the first return. At least two such rows are required. Each column
/// uses the periods where it has both prices; a column with fewer than two such
/// periods gets NaN.
pub fn post_event_volatility(raw: &EventWindow) -> Result<BTreeMap<String, f64>, AnalyticsError> {
    let post = raw.since_anchor();
    if post.len() < 2 {
        return Err(AnalyticsError::InsufficientWindow {
            metric: "volatility",
            required: 2,
            found: post.len(),
        });
    }

    let volatility = post
        .tickers()
        .iter()
        .enumerate()
        .map(|(i, ticker)| (ticker.clone(), post.column_returns(i).std_dev()))
        .collect();
    Ok(volatility)
}
