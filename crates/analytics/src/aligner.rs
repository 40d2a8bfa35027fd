use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{Event, EventWindow, PriceTable, WindowConfig};

/// Finds the trading date closest (in calendar days) to `requested`.
///
/// When two trading dates are equally distant the later one wins: the earlier
/// candidate is only chosen when it is strictly closer.
pub fn locate_anchor(requested: NaiveDate, table: &PriceTable) -> Result<NaiveDate, AnalyticsError> {
    let dates = table.dates();
    let after_idx = dates.partition_point(|date| *date < requested);

    let before = after_idx.checked_sub(1).map(|i| dates[i]);
    let after = dates.get(after_idx).copied();

    match (before, after) {
        (Some(before), Some(after)) => {
            let back = requested.signed_duration_since(before).num_days();
            let forward = after.signed_duration_since(requested).num_days();
            Ok(if back < forward { before } else { after })
        }
        (Some(before), None) => Ok(before),
        (None, Some(after)) => Ok(after),
        (None, None) => Err(AnalyticsError::DataUnavailable(
            "price table has no rows".to_string(),
        )),
    }
}

/// Cuts `pre_window` rows before and `post_window` rows after the anchor row,
/// clamped to the table bounds, and re-indexes them by calendar-day offset.
pub fn build_window(
    table: &PriceTable,
    anchor: NaiveDate,
    config: WindowConfig,
) -> Result<EventWindow, AnalyticsError> {
    if table.is_empty() {
        return Err(AnalyticsError::DataUnavailable(
            "price table has no rows".to_string(),
        ));
    }
    let idx = table.position(anchor).ok_or(AnalyticsError::AnchorNotFound)?;

    let start = idx.saturating_sub(config.pre_window);
    let end = idx
        .saturating_add(config.post_window)
        .saturating_add(1)
        .min(table.len());

    tracing::debug!(%anchor, start, end, "Building event window.");

    let window = EventWindow::new(
        anchor,
        table.tickers().to_vec(),
        table.dates()[start..end].to_vec(),
        table.rows()[start..end].to_vec(),
    )?;
    Ok(window)
}

/// Snaps the event to its nearest trading day and builds the raw window around it.
pub fn align(
    table: &PriceTable,
    event: &Event,
    config: WindowConfig,
) -> Result<EventWindow, AnalyticsError> {
    let anchor = locate_anchor(event.date, table)?;
    tracing::info!(
        event = %event.label,
        requested = %event.date,
        %anchor,
        "Using nearest trading day."
    );
    build_window(table, anchor, config)
}
