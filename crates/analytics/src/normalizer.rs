use crate::error::AnalyticsError;
use core_types::{EventWindow, NormalizedWindow};

/// Divides every column by its value at offset 0.
///
/// A column that has no value (or a zero) at the anchor cannot be rescaled and
/// becomes entirely missing; gaps elsewhere stay gaps.
pub fn normalize(window: &EventWindow) -> Result<NormalizedWindow, AnalyticsError> {
    let anchor = window
        .anchor_position()
        .ok_or(AnalyticsError::AnchorNotFound)?;
    let base = window.rows()[anchor].clone();

    let normalized = window.map_cells(|column, cell| match (cell, base[column]) {
        (Some(value), Some(base)) if base != 0.0 => Some(value / base),
        _ => None,
    });
    Ok(NormalizedWindow::new(normalized))
}
