use crate::{DataError, PriceSource, finish};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PriceTable;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reads prices from a wide CSV file: a `date` column followed by one column per
/// ticker. Empty cells are gaps.
///
/// ```text
/// date,^GSPC,XLE
/// 2020-03-13,2711.02,35.10
/// 2020-03-16,2386.13,
/// ```
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_prices(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        tracing::info!(path = %self.path.display(), "Reading prices from CSV.");
        let text = tokio::fs::read_to_string(&self.path).await?;
        finish(parse_wide_csv(&text, tickers, start, end)?)
    }
}

/// Parses a wide price CSV, keeping the requested tickers (in request order) and
/// the dates in `[start, end)`. Rows may appear in any order.
///
/// A requested ticker absent from the header becomes an all-missing column.
pub fn parse_wide_csv(
    text: &str,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    let columns: Vec<Option<usize>> = tickers
        .iter()
        .map(|ticker| {
            let column = header.iter().skip(1).position(|h| h == ticker.as_str()).map(|i| i + 1);
            if column.is_none() {
                tracing::warn!(%ticker, "Ticker not found in the price file.");
            }
            column
        })
        .collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            DataError::InvalidData(format!("row {}: bad date '{raw_date}': {e}", line + 1))
        })?;
        if date < start || date >= end {
            continue;
        }

        let row = columns
            .iter()
            .map(|column| match column.and_then(|c| record.get(c)) {
                None | Some("") => Ok(None),
                Some(cell) => cell.parse::<f64>().map(Some).map_err(|e| {
                    DataError::InvalidData(format!("row {}: bad price '{cell}': {e}", line + 1))
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if by_date.insert(date, row).is_some() {
            return Err(DataError::InvalidData(format!("date {date} appears more than once")));
        }
    }

    let (dates, rows): (Vec<_>, Vec<_>) = by_date.into_iter().unzip();
    Ok(PriceTable::new(tickers.to_vec(), dates, rows)?)
}
