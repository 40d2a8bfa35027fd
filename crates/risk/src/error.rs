use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Risk parameters are invalid: {0}")]
    InvalidParameters(String),

    #[error("Market series '{0}' is not present in the window")]
    MissingMarketSeries(String),

    #[error("Not enough data for beta: need at least {required} rows, found {found}")]
    InsufficientWindow { required: usize, found: usize },
}
