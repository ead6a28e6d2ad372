use crate::api::models::{AggsResponse, DailyOpenClose};
use crate::types::{AssetClass, PriceBar, Timeframe};
use anyhow::{bail, Context, Result};
use chrono::{Duration, Months, NaiveDate};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};

pub const RATE_LIMIT_MESSAGE: &str =
    "Rate limited by the market data provider. Try again in 1 minute.";
pub const NO_DATA_MESSAGE: &str = "No data available for the selected asset.";

/// Rewrite a symbol into the provider's form: crypto trades as a
/// crypto-vs-USD compound ticker, equities and ETFs pass through unchanged.
pub fn provider_symbol(symbol: &str, class: AssetClass) -> String {
    match class {
        AssetClass::Crypto => format!("X:{}USD", symbol.to_ascii_uppercase()),
        AssetClass::Etf | AssetClass::Stocks => symbol.to_ascii_uppercase(),
    }
}

/// Start of the chart window for a timeframe. Each timeframe carries a
/// fixed, hardcoded lookback; this is not user-configurable.
pub fn lookback_start(timeframe: Timeframe, today: NaiveDate) -> NaiveDate {
    match timeframe {
        Timeframe::Hour => today - Duration::days(10),
        Timeframe::Day => today - Duration::days(50),
        Timeframe::Week => today - Duration::weeks(30),
        Timeframe::Month => today.checked_sub_months(Months::new(20)).unwrap_or(today),
        Timeframe::Year => today.checked_sub_months(Months::new(72)).unwrap_or(today),
    }
}

/// Client for the external price-quote provider.
#[derive(Clone)]
pub struct MarketDataClient {
    base_url: String,
    api_key: SecretString,
    client: Client,
}

impl MarketDataClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.to_string()),
            client: Client::new(),
        }
    }

    /// Ordered-by-time aggregate bars for
    /// `(symbol, class, timeframe, from, to)`. An upstream failure or an
    /// empty result set is an error; the caller decides how to degrade.
    pub async fn aggregates(
        &self,
        symbol: &str,
        class: AssetClass,
        timeframe: Timeframe,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/{}/{}/{}",
            self.base_url,
            provider_symbol(symbol, class),
            timeframe.as_str(),
            from,
            to,
        );

        let resp = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.expose_secret())])
            .send()
            .await
            .context("aggregates request failed")?;
        let resp = Self::check_status(resp)?;

        let parsed: AggsResponse = resp.json().await.context("decode aggregates response")?;
        let mut bars: Vec<PriceBar> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|bar| bar.into_bar())
            .collect();
        if bars.is_empty() {
            bail!("{NO_DATA_MESSAGE}");
        }
        bars.sort_by_key(|bar| bar.timestamp_ms);
        Ok(bars)
    }

    /// Daily reference quote for a single date. Crypto uses the dedicated
    /// crypto-vs-USD path, everything else the plain symbol path.
    pub async fn daily_open_close(
        &self,
        symbol: &str,
        class: AssetClass,
        date: NaiveDate,
    ) -> Result<DailyOpenClose> {
        let symbol = symbol.to_ascii_uppercase();
        let url = match class {
            AssetClass::Crypto => {
                format!("{}/v1/open-close/crypto/{}/USD/{}", self.base_url, symbol, date)
            }
            AssetClass::Etf | AssetClass::Stocks => {
                format!("{}/v1/open-close/{}/{}", self.base_url, symbol, date)
            }
        };

        let resp = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.expose_secret())])
            .send()
            .await
            .context("daily quote request failed")?;
        let resp = Self::check_status(resp)?;

        resp.json().await.context("decode daily quote response")
    }

    fn check_status(resp: Response) -> Result<Response> {
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            bail!("{RATE_LIMIT_MESSAGE}");
        }
        resp.error_for_status()
            .context("market data provider rejected the request")
    }
}
