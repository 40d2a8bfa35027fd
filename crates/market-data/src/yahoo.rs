use crate::responses::ChartResponse;
use crate::{DataError, PriceSource, finish};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use core_types::PriceTable;
use std::collections::BTreeMap;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Daily split- and dividend-adjusted closes from the public Yahoo chart API.
#[derive(Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(CHART_URL)
    }

    /// Points the client at a different chart endpoint (a mirror or a proxy).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: base_url.into(),
        })
    }

    async fn fetch_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, DataError> {
        // Index symbols such as ^GSPC must be escaped in the path.
        let url = format!("{}/{}", self.base_url, ticker.replace('^', "%5E"));
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,splits".to_string()),
            ])
            .send()
            .await?
            .json::<ChartResponse>()
            .await?;

        let series = parse_chart(ticker, response)?;
        tracing::debug!(%ticker, points = series.len(), "Downloaded daily closes.");
        // The chart API treats period2 as inclusive of that day's bar.
        Ok(series.into_iter().filter(|(date, _)| *date >= start && *date < end).collect())
    }
}

#[async_trait]
impl PriceSource for YahooChartClient {
    async fn fetch_prices(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        tracing::info!(tickers = ?tickers, %start, %end, "Downloading daily closes.");
        let results = futures::future::join_all(
            tickers.iter().map(|ticker| self.fetch_series(ticker, start, end)),
        )
        .await;

        let mut series = Vec::with_capacity(tickers.len());
        let mut first_error = None;
        for (ticker, result) in tickers.iter().zip(results) {
            match result {
                Ok(points) => series.push((ticker.clone(), points)),
                Err(e) => {
                    // One bad symbol leaves a gap column instead of sinking the basket.
                    tracing::warn!(%ticker, error = %e, "Download failed; column will be empty.");
                    series.push((ticker.clone(), BTreeMap::new()));
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            if series.iter().all(|(_, points)| points.is_empty()) {
                return Err(e);
            }
        }
        finish(PriceTable::from_series(series)?)
    }
}

/// Extracts `date -> close` from a chart response, preferring adjusted closes.
///
/// Timestamps are shifted by the exchange's UTC offset before taking the date, so
/// a bar stamped at the US open lands on its own trading day. Null closes are
/// skipped.
pub fn parse_chart(
    ticker: &str,
    response: ChartResponse,
) -> Result<BTreeMap<NaiveDate, f64>, DataError> {
    if let Some(error) = response.chart.error {
        return Err(DataError::Api(
            ticker.to_string(),
            format!("{}: {}", error.code, error.description),
        ));
    }
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::InvalidData(format!("no chart data for '{ticker}'")))?;

    let closes = match result.indicators.adjclose.into_iter().next() {
        Some(adjusted) => adjusted.adjclose,
        None => result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|quote| quote.close)
            .unwrap_or_default(),
    };
    if closes.len() != result.timestamp.len() {
        return Err(DataError::InvalidData(format!(
            "'{ticker}': {} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let offset = result.meta.gmtoffset;
    result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| close.map(|close| (ts, close)))
        .map(|(ts, close)| {
            DateTime::from_timestamp(ts + offset, 0)
                .map(|local| (local.date_naive(), close))
                .ok_or_else(|| DataError::InvalidData(format!("invalid timestamp {ts}")))
        })
        .collect()
}
