use chrono::NaiveDate;
use core_types::{Event, WindowConfig};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub study: StudySettings,
    /// The events to study, in the order they should be reported.
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub zoom: ZoomSettings,
    /// Optional display names for tickers (e.g. "^GSPC" -> "S&P 500").
    #[serde(default)]
    pub labels: Vec<TickerLabel>,
    #[serde(default)]
    pub data: DataSettings,
}

impl Config {
    /// The display name of a ticker, falling back to the ticker itself.
    pub fn label_for<'a>(&'a self, ticker: &'a str) -> &'a str {
        self.labels
            .iter()
            .find(|l| l.ticker == ticker)
            .map_or(ticker, |l| l.name.as_str())
    }
}

/// A human-readable name shown in place of a ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerLabel {
    pub ticker: String,
    pub name: String,
}

/// The fixed parameters of an event study run.
#[derive(Debug, Clone, Deserialize)]
pub struct StudySettings {
    /// Every ticker to download, the market ticker included.
    pub tickers: Vec<String>,
    /// The benchmark series betas are measured against. It never appears in summaries.
    pub market_ticker: String,
    /// First calendar date of price history to request.
    pub start_date: NaiveDate,
    /// End of the requested history (exclusive).
    pub end_date: NaiveDate,
    /// Trading rows kept before the anchor row.
    pub pre_window: usize,
    /// Trading rows kept after the anchor row.
    pub post_window: usize,
}

impl StudySettings {
    pub fn window(&self) -> WindowConfig {
        WindowConfig {
            pre_window: self.pre_window,
            post_window: self.post_window,
        }
    }
}

/// The zoom levels evaluated for every event when none are given on the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoomSettings {
    pub presets: Vec<ZoomPreset>,
}

/// A named symmetric zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoomPreset {
    pub label: String,
    /// Half-width in calendar days. `None` means the full window.
    #[serde(default)]
    pub days: Option<u32>,
}

impl ZoomPreset {
    pub fn new(label: impl Into<String>, days: Option<u32>) -> Self {
        Self {
            label: label.into(),
            days,
        }
    }

    /// The effective half-width for a window whose widest zoom is `max_zoom`.
    pub fn resolve(&self, max_zoom: u32) -> u32 {
        self.days.map_or(max_zoom, |days| days.min(max_zoom))
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            presets: vec![
                ZoomPreset::new("±1 day", Some(1)),
                ZoomPreset::new("±1 week", Some(7)),
                ZoomPreset::new("±1 month (~30 days)", Some(30)),
                ZoomPreset::new("±3 months (~90 days)", Some(90)),
                ZoomPreset::new("±6 months (~180 days)", Some(180)),
                ZoomPreset::new("±1 year (~365 days)", Some(365)),
                ZoomPreset::new("Full window", None),
            ],
        }
    }
}

/// Where price history comes from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSettings {
    #[serde(default)]
    pub source: SourceKind,
    /// Wide CSV file (`date,<ticker>...`) used by the CSV source.
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
}

#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    #[default]
    Yahoo,
}
