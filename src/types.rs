use anyhow::bail;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Etf,
    Stocks,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [AssetClass::Crypto, AssetClass::Etf, AssetClass::Stocks];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Crypto => "crypto",
            AssetClass::Etf => "etf",
            AssetClass::Stocks => "stocks",
        }
    }

    /// Fixed buy-side universe per asset class.
    pub fn curated_symbols(self) -> &'static [&'static str] {
        match self {
            AssetClass::Crypto => &[
                "BTC", "ETH", "XRP", "LTC", "ADA", "SOL", "DOT", "DOGE", "UNI", "LINK", "BNB",
                "USDC", "XLM", "TRX", "EOS",
            ],
            AssetClass::Etf => &[
                "SPY", "IVV", "VTI", "VEA", "EFA", "IEFA", "VWO", "QQQ", "VUG", "IEMG", "ARKK",
                "XLE", "XLF", "XLK", "XLU",
            ],
            AssetClass::Stocks => &[
                "AAPL", "GOOGL", "MSFT", "AMZN", "FB", "BABA", "NFLX", "TSLA", "BRK.B", "V",
                "JNJ", "WMT", "VZ", "PG", "DIS",
            ],
        }
    }

    /// Look a symbol up across the curated universes.
    pub fn classify_symbol(symbol: &str) -> Option<AssetClass> {
        AssetClass::ALL
            .into_iter()
            .find(|class| class.curated_symbols().contains(&symbol))
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crypto" => Ok(AssetClass::Crypto),
            "etf" => Ok(AssetClass::Etf),
            "stocks" | "stock" => Ok(AssetClass::Stocks),
            other => bail!("unknown asset class '{other}' (expected crypto, etf or stocks)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => bail!("unknown trade side '{other}' (expected buy or sell)"),
        }
    }
}

/// Chart resolution; each maps to a fixed provider lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Hour => "hour",
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(Timeframe::Hour),
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            other => bail!("unknown timeframe '{other}' (expected hour, day, week, month or year)"),
        }
    }
}

/// One bar of the provider's aggregate series. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp_ms: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Server-owned holding snapshot; always re-fetched, never patched locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAsset {
    #[serde(default)]
    pub id: Option<i64>,
    pub asset_name: String,
    pub category: AssetClass,
    pub quantity: Decimal,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<i64>,
    pub asset_name: String,
    pub category: AssetClass,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub transaction_type: TradeSide,
    pub timestamp: DateTime<Utc>,
}

/// Payload for `POST /transactions/create`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub asset_name: String,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub transaction_type: TradeSide,
    pub category: AssetClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Entry of the server-side market asset catalog (`GET /assets`).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAsset {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub asset_type: String,
}
