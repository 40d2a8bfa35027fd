use crate::error::CoreError;
use chrono::NaiveDate;
use serde::Serialize;
use std::ops::Deref;

/// A contiguous run of trading rows around an event anchor, indexed by the signed
/// number of calendar days from the anchor date.
///
/// Offsets follow the calendar, not the trading-day count, so they skip weekends
/// and holidays. Windows produced by the aligner always contain offset 0; any
/// zoomed slice of such a window keeps it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventWindow {
    anchor: NaiveDate,
    tickers: Vec<String>,
    offsets: Vec<i64>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Option<f64>>>,
}

impl EventWindow {
    pub fn new(
        anchor: NaiveDate,
        tickers: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if dates.len() != rows.len() {
            return Err(CoreError::InvalidInput(
                "window".to_string(),
                format!("{} dates but {} rows", dates.len(), rows.len()),
            ));
        }
        if rows.iter().any(|row| row.len() != tickers.len()) {
            return Err(CoreError::InvalidInput(
                "window".to_string(),
                format!("every row must hold {} cells", tickers.len()),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidInput(
                "window".to_string(),
                "dates must strictly increase".to_string(),
            ));
        }

        let offsets = dates
            .iter()
            .map(|date| date.signed_duration_since(anchor).num_days())
            .collect();

        Ok(Self {
            anchor,
            tickers,
            offsets,
            dates,
            rows,
        })
    }

    /// Builds a window directly from relative-day offsets. The anchor date is taken
    /// as offset 0 and each row's date is derived from its offset.
    pub fn from_offsets(
        anchor: NaiveDate,
        tickers: Vec<String>,
        offsets: &[i64],
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        let dates = offsets
            .iter()
            .map(|&offset| {
                anchor
                    .checked_add_signed(chrono::Duration::days(offset))
                    .ok_or_else(|| {
                        CoreError::InvalidInput(
                            "offsets".to_string(),
                            format!("offset {offset} is out of the calendar range"),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(anchor, tickers, dates, rows)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn column_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Row index of offset 0, if present.
    pub fn anchor_position(&self) -> Option<usize> {
        self.offsets.binary_search(&0).ok()
    }

    /// `(offset, cell)` pairs of one column in chronological order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = (i64, Option<f64>)> + '_ {
        self.offsets
            .iter()
            .zip(&self.rows)
            .map(move |(&offset, row)| (offset, row[index]))
    }

    /// The widest useful zoom: the larger distance from the anchor to either edge.
    pub fn max_zoom(&self) -> u32 {
        let furthest = match (self.offsets.first(), self.offsets.last()) {
            (Some(first), Some(last)) => first.unsigned_abs().max(last.unsigned_abs()),
            _ => 0,
        };
        u32::try_from(furthest).unwrap_or(u32::MAX)
    }

    /// Restricts the window to offsets in `[-zoom, +zoom]`, with `zoom` clamped to
    /// [`max_zoom`](Self::max_zoom).
    pub fn zoom(&self, zoom: u32) -> Self {
        let zoom = i64::from(zoom.min(self.max_zoom()));
        self.retain(|offset| (-zoom..=zoom).contains(&offset))
    }

    /// Rows at or after the anchor (offset 0 included).
    pub fn since_anchor(&self) -> Self {
        self.retain(|offset| offset >= 0)
    }

    /// Applies `f(column_index, cell)` to every cell, keeping the row layout.
    pub fn map_cells<F>(&self, f: F) -> Self
    where
        F: Fn(usize, Option<f64>) -> Option<f64>,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().enumerate().map(|(i, &cell)| f(i, cell)).collect())
            .collect();
        Self {
            anchor: self.anchor,
            tickers: self.tickers.clone(),
            offsets: self.offsets.clone(),
            dates: self.dates.clone(),
            rows,
        }
    }

    /// Simple period returns `p[t] / p[t-1] - 1` of one column.
    ///
    /// A period is skipped when either of its two cells is missing. Gaps in other
    /// columns have no effect.
    pub fn column_returns(&self, index: usize) -> Vec<f64> {
        self.rows
            .windows(2)
            .filter_map(|pair| period_return(pair, index))
            .collect()
    }

    /// Period returns of columns `a` and `b` over the periods where both have both
    /// cells, so the two series stay aligned period-by-period.
    pub fn paired_returns(&self, a: usize, b: usize) -> (Vec<f64>, Vec<f64>) {
        self.rows
            .windows(2)
            .filter_map(|pair| Some((period_return(pair, a)?, period_return(pair, b)?)))
            .unzip()
    }

    fn retain<P>(&self, keep: P) -> Self
    where
        P: Fn(i64) -> bool,
    {
        let mut offsets = Vec::new();
        let mut dates = Vec::new();
        let mut rows = Vec::new();
        for ((&offset, &date), row) in self.offsets.iter().zip(&self.dates).zip(&self.rows) {
            if keep(offset) {
                offsets.push(offset);
                dates.push(date);
                rows.push(row.clone());
            }
        }
        Self {
            anchor: self.anchor,
            tickers: self.tickers.clone(),
            offsets,
            dates,
            rows,
        }
    }
}

fn period_return(pair: &[Vec<Option<f64>>], index: usize) -> Option<f64> {
    match (pair[0][index], pair[1][index]) {
        (Some(prev), Some(next)) => Some(next / prev - 1.0),
        _ => None,
    }
}

/// An [`EventWindow`] whose every column has been divided by its anchor value.
///
/// Kept as a distinct type so engines that expect relative levels (drawdown,
/// recovery, returns) cannot be handed raw prices by mistake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedWindow(EventWindow);

impl NormalizedWindow {
    /// Wraps a window whose values are already expressed relative to the anchor.
    pub fn new(window: EventWindow) -> Self {
        Self(window)
    }

    pub fn window(&self) -> &EventWindow {
        &self.0
    }

    pub fn into_inner(self) -> EventWindow {
        self.0
    }

    pub fn zoom(&self, zoom: u32) -> Self {
        Self(self.0.zoom(zoom))
    }
}

impl Deref for NormalizedWindow {
    type Target = EventWindow;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
