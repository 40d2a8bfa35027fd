use crate::error::AnalyticsError;
use core_types::{NormalizedWindow, ReturnPair, ReturnTable};

/// How close a normalized cell must be to 1.0 to count as the anchor.
pub const ANCHOR_TOLERANCE: f64 = 1e-9;

/// Pre- and post-event returns measured against the rows currently visible.
///
/// `pre_return = 1 / first - 1` runs from the first visible row to the anchor and
/// `post_return = last - 1` from the anchor to the last visible row, so the same
/// window yields different returns at different zoom levels. A ticker with a gap
/// in a boundary row gets `NaN` for that side.
pub fn compute(slice: &NormalizedWindow) -> Result<ReturnTable, AnalyticsError> {
    let rows = slice.rows();
    if rows.len() < 2 {
        return Err(insufficient(rows.len()));
    }
    let first = &rows[0];
    let last = &rows[rows.len() - 1];

    let has_anchor = rows
        .iter()
        .flatten()
        .flatten()
        .any(|value| (value - 1.0).abs() <= ANCHOR_TOLERANCE);
    if !has_anchor {
        return Err(AnalyticsError::AnchorNotFound);
    }

    let returns = slice
        .tickers()
        .iter()
        .enumerate()
        .map(|(i, ticker)| {
            let pair = ReturnPair {
                pre_return: first[i].map_or(f64::NAN, |v| 1.0 / v - 1.0),
                post_return: last[i].map_or(f64::NAN, |v| v - 1.0),
            };
            (ticker.clone(), pair)
        })
        .collect();
    Ok(returns)
}

fn insufficient(found: usize) -> AnalyticsError {
    AnalyticsError::InsufficientWindow {
        metric: "returns",
        required: 2,
        found,
    }
}
