use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PriceTable;

pub mod csv_source;
pub mod error;
pub mod responses;
pub mod yahoo;

// --- Public API ---
pub use csv_source::CsvPriceSource;
pub use error::DataError;
pub use yahoo::YahooChartClient;

/// The interface for anything that can supply daily closing prices.
///
/// Implementations return a table covering `[start, end)` with one column per
/// requested ticker, in request order, and with all-missing rows removed.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError>;
}

/// Drops rows no ticker traded on and rejects a table with nothing left in it.
pub(crate) fn finish(table: PriceTable) -> Result<PriceTable, DataError> {
    let table = table.drop_empty_rows();
    if table.is_empty() || table.is_all_missing() {
        return Err(DataError::Empty);
    }
    tracing::debug!(
        rows = table.len(),
        tickers = table.tickers().len(),
        "Price table ready."
    );
    Ok(table)
}
