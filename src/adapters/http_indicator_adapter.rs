//! Live indicator provider backed by public price APIs.
//!
//! Current price comes from a CoinDesk-style `currentprice` endpoint, daily
//! history from a CoinGecko-style `market_chart` endpoint.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::config_validation::{read_history_days, read_timeout};
use crate::domain::error::ActiveDcaError;
use crate::domain::valuation::{compute_indicator, LiveIndicator};
use crate::ports::config_port::ConfigPort;
use crate::ports::indicator_port::IndicatorProvider;

pub const DEFAULT_CURRENT_PRICE_URL: &str = "https://api.coindesk.com/v1/bpi/currentprice/USD.json";
pub const DEFAULT_HISTORY_URL: &str = "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart";

#[derive(Debug, Deserialize)]
struct CurrentPriceResponse {
    bpi: Bpi,
}

#[derive(Debug, Deserialize)]
struct Bpi {
    #[serde(rename = "USD")]
    usd: BpiRate,
}

#[derive(Debug, Deserialize)]
struct BpiRate {
    rate_float: f64,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs, oldest first.
    prices: Vec<(f64, f64)>,
}

#[derive(Debug)]
pub struct HttpIndicatorAdapter {
    client: reqwest::blocking::Client,
    current_price_url: String,
    history_url: String,
    history_days: i64,
}

impl HttpIndicatorAdapter {
    pub fn new(
        current_price_url: String,
        history_url: String,
        history_days: i64,
        timeout: Duration,
    ) -> Result<Self, ActiveDcaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(fetch_err)?;
        Ok(Self {
            client,
            current_price_url,
            history_url,
            history_days,
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ActiveDcaError> {
        Self::new(
            config
                .get_string("live", "current_price_url")
                .unwrap_or_else(|| DEFAULT_CURRENT_PRICE_URL.to_string()),
            config
                .get_string("live", "history_url")
                .unwrap_or_else(|| DEFAULT_HISTORY_URL.to_string()),
            read_history_days(config)?,
            read_timeout(config)?,
        )
    }

    fn fetch_current_price(&self) -> Result<f64, ActiveDcaError> {
        let response: CurrentPriceResponse = self
            .client
            .get(&self.current_price_url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(fetch_err)?;
        Ok(response.bpi.usd.rate_float)
    }

    fn fetch_history(&self) -> Result<Vec<f64>, ActiveDcaError> {
        let days = self.history_days.to_string();
        let response: MarketChartResponse = self
            .client
            .get(&self.history_url)
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(fetch_err)?;
        Ok(response.prices.into_iter().map(|(_, price)| price).collect())
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

fn fetch_err(e: reqwest::Error) -> ActiveDcaError {
    ActiveDcaError::IndicatorFetch {
        reason: e.to_string(),
    }
}

impl IndicatorProvider for HttpIndicatorAdapter {
    fn fetch_current_indicator(&self) -> Result<LiveIndicator, ActiveDcaError> {
        let price = self.fetch_current_price()?;
        log::info!("current BTC price: {:.2}", price);

        let history = self.fetch_history()?;
        log::info!("fetched {} historical prices", history.len());

        compute_indicator(price, &history, Self::today())
    }
}
