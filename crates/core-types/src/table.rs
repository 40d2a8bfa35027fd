use crate::error::CoreError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Chronologically ordered, date-keyed closing prices for a basket of tickers.
///
/// Each row holds one cell per ticker; a missing cell is a gap in that series and
/// is never interpolated. Non-finite inputs are stored as gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Builds a table from row-major cells, checking that dates strictly increase
    /// and that every row has one cell per ticker.
    pub fn new(
        tickers: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = tickers.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(CoreError::InvalidInput(
                "tickers".to_string(),
                format!("ticker '{duplicate}' appears more than once"),
            ));
        }
        if dates.len() != rows.len() {
            return Err(CoreError::InvalidInput(
                "rows".to_string(),
                format!("{} dates but {} rows", dates.len(), rows.len()),
            ));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != tickers.len()) {
            return Err(CoreError::InvalidInput(
                "rows".to_string(),
                format!(
                    "row {} has {} cells, expected {}",
                    bad,
                    rows[bad].len(),
                    tickers.len()
                ),
            ));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidInput(
                "dates".to_string(),
                format!("dates must strictly increase ({} then {})", pair[0], pair[1]),
            ));
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|v| v.is_finite()))
                    .collect()
            })
            .collect();

        Ok(Self {
            tickers,
            dates,
            rows,
        })
    }

    /// Merges independent per-ticker series on the union of their dates. A ticker
    /// without a quote on a given date gets a gap in that row.
    pub fn from_series(series: Vec<(String, BTreeMap<NaiveDate, f64>)>) -> Result<Self, CoreError> {
        let dates: BTreeSet<NaiveDate> = series
            .iter()
            .flat_map(|(_, points)| points.keys().copied())
            .collect();
        let dates: Vec<NaiveDate> = dates.into_iter().collect();

        let rows = dates
            .iter()
            .map(|date| {
                series
                    .iter()
                    .map(|(_, points)| points.get(date).copied())
                    .collect()
            })
            .collect();

        let tickers = series.into_iter().map(|(ticker, _)| ticker).collect();
        Self::new(tickers, dates, rows)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Row index of an exact trading date.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// True when no cell in the table carries a value.
    pub fn is_all_missing(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    /// Removes rows in which every ticker is missing (e.g. market holidays that a
    /// provider still reports).
    pub fn drop_empty_rows(self) -> Self {
        let (dates, rows): (Vec<_>, Vec<_>) = self
            .dates
            .into_iter()
            .zip(self.rows)
            .filter(|(_, row)| row.iter().any(Option::is_some))
            .unzip();
        Self {
            tickers: self.tickers,
            dates,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = PriceTable::new(
            vec!["A".into()],
            vec![d("2020-01-02"), d("2020-01-01")],
            vec![vec![Some(1.0)], vec![Some(2.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "dates"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = PriceTable::new(
            vec!["A".into(), "B".into()],
            vec![d("2020-01-01")],
            vec![vec![Some(1.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "rows"));
    }

    #[test]
    fn merges_series_on_date_union() {
        let a = BTreeMap::from([(d("2020-01-01"), 10.0), (d("2020-01-03"), 11.0)]);
        let b = BTreeMap::from([(d("2020-01-02"), 5.0), (d("2020-01-03"), 6.0)]);
        let table = PriceTable::from_series(vec![("A".into(), a), ("B".into(), b)]).unwrap();

        assert_eq!(table.dates(), &[d("2020-01-01"), d("2020-01-02"), d("2020-01-03")]);
        assert_eq!(table.rows()[0], vec![Some(10.0), None]);
        assert_eq!(table.rows()[1], vec![None, Some(5.0)]);
        assert_eq!(table.rows()[2], vec![Some(11.0), Some(6.0)]);
    }

    #[test]
    fn non_finite_cells_become_gaps_and_empty_rows_drop() {
        let table = PriceTable::new(
            vec!["A".into(), "B".into()],
            vec![d("2020-01-01"), d("2020-01-02")],
            vec![vec![Some(f64::NAN), None], vec![Some(1.0), Some(2.0)]],
        )
        .unwrap();
        assert_eq!(table.rows()[0], vec![None, None]);

        let table = table.drop_empty_rows();
        assert_eq!(table.len(), 1);
        assert_eq!(table.dates(), &[d("2020-01-02")]);
        assert!(!table.is_all_missing());
    }
}
