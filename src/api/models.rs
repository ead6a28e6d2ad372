use crate::types::PriceBar;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `{access, refresh}` pair returned by login, signup and token refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct FundsResponse {
    pub amount: Decimal,
}

/// Response of the aggregate-bars endpoint
/// (`/v2/aggs/ticker/{symbol}/range/1/{timeframe}/{from}/{to}`).
#[derive(Debug, Deserialize)]
pub struct AggsResponse {
    #[serde(default)]
    pub results: Option<Vec<AggBar>>,
}

#[derive(Debug, Deserialize)]
pub struct AggBar {
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "o")]
    pub open: Decimal,
    #[serde(rename = "h")]
    pub high: Decimal,
    #[serde(rename = "l")]
    pub low: Decimal,
    #[serde(rename = "c")]
    pub close: Decimal,
    #[serde(rename = "v", default)]
    pub volume: Decimal,
}

impl AggBar {
    pub fn into_bar(self) -> PriceBar {
        PriceBar {
            timestamp_ms: self.timestamp_ms,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Daily reference quote (`/v1/open-close/...`). Crypto responses carry the
/// individual closing trades alongside the consolidated close.
#[derive(Debug, Default, Deserialize)]
pub struct DailyOpenClose {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(rename = "closingTrades", default)]
    pub closing_trades: Vec<ClosingTrade>,
}

#[derive(Debug, Deserialize)]
pub struct ClosingTrade {
    #[serde(rename = "p")]
    pub price: Decimal,
}

impl DailyOpenClose {
    /// Best price among the reported closing trades, if any.
    pub fn closing_trade_high(&self) -> Option<Decimal> {
        self.closing_trades.iter().map(|t| t.price).max()
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub secure_url: String,
}
