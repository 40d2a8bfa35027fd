use crate::error::RiskError;
use crate::RiskModel;
use core_types::{Betas, EventWindow};
use statrs::statistics::Statistics;

/// Single-factor market beta: `cov(asset, market) / var(market)` over simple
/// period returns.
#[derive(Debug, Clone)]
pub struct MarketBeta {
    market_ticker: String,
}

impl MarketBeta {
    /// Creates a new `MarketBeta` measuring sensitivity against `market_ticker`.
    pub fn new(market_ticker: impl Into<String>) -> Result<Self, RiskError> {
        let market_ticker = market_ticker.into();
        if market_ticker.trim().is_empty() {
            return Err(RiskError::InvalidParameters(
                "market ticker must not be empty".to_string(),
            ));
        }
        Ok(Self { market_ticker })
    }

    pub fn market_ticker(&self) -> &str {
        &self.market_ticker
    }

    /// Beta of every non-market column of a raw (sub-)window.
    ///
    /// The first row has no predecessor and contributes no return. Each asset is
    /// paired with the market over the periods where both have prices, so a gap
    /// in one asset never affects another. If the market
    /// did not move at all over the slice its variance is zero and every beta is
    /// non-finite; that is reported as a value, not an error.
    pub fn compute_beta(&self, raw: &EventWindow) -> Result<Betas, RiskError> {
        let market_idx = raw
            .column_index(&self.market_ticker)
            .ok_or_else(|| RiskError::MissingMarketSeries(self.market_ticker.clone()))?;
        if raw.len() < 2 {
            return Err(RiskError::InsufficientWindow {
                required: 2,
                found: raw.len(),
            });
        }

        let betas: Betas = raw
            .tickers()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != market_idx)
            .map(|(i, ticker)| {
                let (asset, market) = raw.paired_returns(i, market_idx);
                let value = beta(&asset, &market);
                if !value.is_finite() {
                    tracing::debug!(
                        ticker = %ticker,
                        periods = market.len(),
                        "Beta is not finite (zero market variance or too few periods)."
                    );
                }
                (ticker.clone(), value)
            })
            .collect();

        Ok(betas)
    }
}

impl RiskModel for MarketBeta {
    fn evaluate(&self, raw: &EventWindow) -> Result<Betas, RiskError> {
        self.compute_beta(raw)
    }
}

/// Sample covariance of `asset` with `market` divided by the sample variance of
/// `market`. Both series must cover the same periods.
pub fn beta(asset: &[f64], market: &[f64]) -> f64 {
    let n = asset.len().min(market.len());
    let (asset, market) = (&asset[..n], &market[..n]);
    let covariance = asset.covariance(market);
    let variance = market.variance();
    covariance / variance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    /// Compounds a starting price through a sequence of period returns.
    fn prices(start: f64, returns: &[f64]) -> Vec<f64> {
        let mut out = vec![start];
        for r in returns {
            let last = out[out.len() - 1];
            out.push(last * (1.0 + r));
        }
        out
    }

    fn window(columns: &[(&str, Vec<f64>)]) -> EventWindow {
        let anchor: NaiveDate = "2008-09-15".parse().unwrap();
        let len = columns[0].1.len();
        let offsets: Vec<i64> = (0..len as i64).collect();
        let rows = (0..len)
            .map(|i| columns.iter().map(|(_, c)| Some(c[i])).collect())
            .collect();
        let tickers = columns.iter().map(|(t, _)| t.to_string()).collect();
        EventWindow::from_offsets(anchor, tickers, &offsets, rows).unwrap()
    }

    #[test]
    fn doubled_returns_give_beta_two() {
        let market = [0.01, 0.02, 0.03];
        let sector: Vec<f64> = market.iter().map(|r| 2.0 * r).collect();
        assert_abs_diff_eq!(beta(&sector, &market), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn scaled_sector_recovers_its_multiplier_from_prices() {
        let market_returns = [0.01, -0.02, 0.015, 0.03, -0.01];
        for k in [-1.5, 0.0, 0.5, 2.0, 3.25] {
            let sector_returns: Vec<f64> = market_returns.iter().map(|r| k * r).collect();
            let raw = window(&[
                ("^GSPC", prices(100.0, &market_returns)),
                ("XLF", prices(40.0, &sector_returns)),
            ]);
            let betas = MarketBeta::new("^GSPC").unwrap().compute_beta(&raw).unwrap();
            assert_abs_diff_eq!(betas["XLF"], k, epsilon = 1e-6);
            assert!(!betas.contains_key("^GSPC"));
        }
    }

    #[test]
    fn flat_market_gives_non_finite_beta() {
        let raw = window(&[
            ("^GSPC", vec![100.0, 100.0, 100.0, 100.0]),
            ("XLE", vec![10.0, 11.0, 10.5, 12.0]),
        ]);
        let betas = MarketBeta::new("^GSPC").unwrap().compute_beta(&raw).unwrap();
        assert!(!betas["XLE"].is_finite());
    }

    #[test]
    fn empty_sector_column_leaves_other_betas_intact() {
        let market_returns = [0.01, -0.02, 0.015, 0.03, -0.01];
        let sector_returns: Vec<f64> = market_returns.iter().map(|r| 2.0 * r).collect();
        let market = prices(100.0, &market_returns);
        let sector = prices(40.0, &sector_returns);
        let rows = (0..market.len())
            .map(|i| vec![Some(market[i]), Some(sector[i]), None])
            .collect();
        let offsets: Vec<i64> = (0..market.len() as i64).collect();
        let raw = EventWindow::from_offsets(
            "2008-09-15".parse().unwrap(),
            vec!["^GSPC".into(), "XLE".into(), "XLF".into()],
            &offsets,
            rows,
        )
        .unwrap();

        let betas = MarketBeta::new("^GSPC").unwrap().compute_beta(&raw).unwrap();
        assert_abs_diff_eq!(betas["XLE"], 2.0, epsilon = 1e-6);
        assert!(betas["XLF"].is_nan());
    }

    #[test]
    fn missing_market_series_is_an_error() {
        let raw = window(&[("XLE", vec![10.0, 11.0]), ("XLK", vec![5.0, 6.0])]);
        assert_eq!(
            MarketBeta::new("^GSPC").unwrap().compute_beta(&raw),
            Err(RiskError::MissingMarketSeries("^GSPC".to_string()))
        );
    }

    #[test]
    fn single_row_is_insufficient() {
        let raw = window(&[("^GSPC", vec![100.0]), ("XLE", vec![10.0])]);
        assert_eq!(
            MarketBeta::new("^GSPC").unwrap().evaluate(&raw),
            Err(RiskError::InsufficientWindow {
                required: 2,
                found: 1
            })
        );
    }

    #[test]
    fn empty_market_ticker_is_rejected() {
        assert!(matches!(
            MarketBeta::new("  "),
            Err(RiskError::InvalidParameters(_))
        ));
    }
}
