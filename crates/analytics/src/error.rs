use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No price data available: {0}")]
    DataUnavailable(String),

    #[error("The anchor row (offset 0, normalized to 1.0) is not present in the window")]
    AnchorNotFound,

    #[error("Not enough data for {metric}: need at least {required} rows, found {found}")]
    InsufficientWindow {
        metric: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Invalid window: {0}")]
    Window(#[from] CoreError),
}
