use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The chart API returned an error for '{0}': {1}")]
    Api(String, String),

    #[error("Failed to read the price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the price file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid price data: {0}")]
    InvalidData(String),

    #[error("No valid price data was returned. Check tickers and dates.")]
    Empty,

    #[error(transparent)]
    Core(#[from] CoreError),
}
