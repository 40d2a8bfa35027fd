use core_types::{NormalizedWindow, RecoveryDays};
use std::collections::BTreeMap;

/// Maximum drawdown per column: `1 - min(value)` over every visible row.
///
/// Pre-event rows count as well as post-event ones. Because the anchor (1.0)
/// is always visible the result is never negative. A column with no values
/// yields `NaN`.
pub fn max_drawdown(slice: &NormalizedWindow) -> BTreeMap<String, f64> {
    slice
        .tickers()
        .iter()
        .enumerate()
        .map(|(i, ticker)| {
            let trough = slice
                .column(i)
                .filter_map(|(_, cell)| cell)
                .fold(None, |lowest: Option<f64>, v| Some(lowest.map_or(v, |m| m.min(v))));
            (ticker.clone(), trough.map_or(f64::NAN, |m| 1.0 - m))
        })
        .collect()
}

/// Days from the anchor until each column first regains its pre-event peak.
///
/// The peak is the maximum over offsets strictly below 0 and the trough the
/// first minimum over offsets strictly above 0; the anchor row takes part in
/// neither. The search for a recovered value starts at the trough (inclusive).
pub fn recovery_days(slice: &NormalizedWindow) -> BTreeMap<String, RecoveryDays> {
    slice
        .tickers()
        .iter()
        .enumerate()
        .map(|(i, ticker)| {
            let days = column_recovery(slice.column(i));
            tracing::debug!(ticker = %ticker, %days, "Recovery computed.");
            (ticker.clone(), days)
        })
        .collect()
}

fn column_recovery(column: impl Iterator<Item = (i64, Option<f64>)>) -> RecoveryDays {
    let mut pre_peak: Option<f64> = None;
    let mut post: Vec<(i64, f64)> = Vec::new();

    for (offset, cell) in column {
        let Some(value) = cell else { continue };
        if offset < 0 {
            pre_peak = Some(pre_peak.map_or(value, |peak| peak.max(value)));
        } else if offset > 0 {
            post.push((offset, value));
        }
    }

    let Some(pre_peak) = pre_peak else {
        return RecoveryDays::Unbounded;
    };

    // First occurrence of the lowest post-event value.
    let mut trough: Option<usize> = None;
    for (idx, &(_, value)) in post.iter().enumerate() {
        if trough.is_none_or(|t| value < post[t].1) {
            trough = Some(idx);
        }
    }
    let Some(trough) = trough else {
        return RecoveryDays::Unbounded;
    };

    post[trough..]
        .iter()
        .find(|&&(_, value)| value >= pre_peak)
        .map_or(RecoveryDays::Unbounded, |&(offset, _)| RecoveryDays::Recovered(offset))
}
