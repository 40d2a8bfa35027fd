use crate::error::ConfigError;
use std::collections::HashSet;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataSettings, SourceKind, StudySettings, TickerLabel, ZoomPreset, ZoomSettings};

/// Loads the application configuration from a TOML file.
///
/// Values can be overridden through `AFTERSHOCK__`-prefixed environment variables,
/// e.g. `AFTERSHOCK__STUDY__PRE_WINDOW=250`. The result is validated before it is
/// returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("AFTERSHOCK").separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        tickers = config.study.tickers.len(),
        events = config.events.len(),
        "Configuration loaded."
    );
    Ok(config)
}

/// Parses and validates configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Checks the cross-field rules `serde` cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let study = &config.study;

    if study.tickers.is_empty() {
        return Err(ConfigError::ValidationError(
            "study.tickers must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = study.tickers.iter().find(|t| !seen.insert(t.as_str())) {
        return Err(ConfigError::ValidationError(format!(
            "ticker '{duplicate}' is listed more than once"
        )));
    }
    if !study.tickers.contains(&study.market_ticker) {
        return Err(ConfigError::ValidationError(format!(
            "market ticker '{}' must be one of study.tickers",
            study.market_ticker
        )));
    }
    if study.start_date >= study.end_date {
        return Err(ConfigError::ValidationError(format!(
            "start_date ({}) must be before end_date ({})",
            study.start_date, study.end_date
        )));
    }
    if study.pre_window + study.post_window == 0 {
        return Err(ConfigError::ValidationError(
            "pre_window and post_window cannot both be zero".to_string(),
        ));
    }
    Ok(())
}
