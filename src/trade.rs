use crate::api::backend::BackendClient;
use crate::api::market_data::MarketDataClient;
use crate::api::models::DailyOpenClose;
use crate::types::{AssetClass, NewTransaction, TradeSide, UserAsset};
use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

/// Map a calendar date to the last presumed-open market day. Weekend-skip
/// heuristic only; holidays are ignored.
pub fn adjust_trading_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sun => date - Duration::days(2),
        Weekday::Mon => date - Duration::days(3),
        _ => date - Duration::days(1),
    }
}

/// Sell-side universe entry: what the user currently holds.
#[derive(Debug, Clone)]
pub struct Holding {
    pub name: String,
    pub quantity: Decimal,
}

impl From<&UserAsset> for Holding {
    fn from(asset: &UserAsset) -> Self {
        Self {
            name: asset.asset_name.clone(),
            quantity: asset.quantity,
        }
    }
}

/// Trade-intent controller.
///
/// Drives the two-step flow: pick side/class/asset and a quantity, fetch a
/// reference price explicitly, then execute against ordered preconditions.
/// Any identity change (side, class, asset) clears quantity and reference
/// price; a quantity change keeps the per-unit price and only recomputes
/// the total.
pub struct TradeForm {
    side: TradeSide,
    class: AssetClass,
    holdings: Vec<Holding>,
    asset: Option<String>,
    quantity: Decimal,
    reference_price: Option<Decimal>,
    max_quantity: Decimal,
    field_error: Option<String>,
}

impl TradeForm {
    pub fn new(side: TradeSide, class: AssetClass, holdings: Vec<Holding>) -> Self {
        Self {
            side,
            class,
            holdings,
            asset: None,
            quantity: Decimal::ZERO,
            reference_price: None,
            max_quantity: Decimal::ZERO,
            field_error: None,
        }
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn class(&self) -> AssetClass {
        self.class
    }

    pub fn asset(&self) -> Option<&str> {
        self.asset.as_deref()
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn reference_price(&self) -> Option<Decimal> {
        self.reference_price
    }

    pub fn max_quantity(&self) -> Decimal {
        self.max_quantity
    }

    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    /// The assets currently offered for selection: holdings when selling,
    /// the fixed curated list of the class when buying.
    pub fn selectable_assets(&self) -> Vec<String> {
        match self.side {
            TradeSide::Sell => self.holdings.iter().map(|h| h.name.clone()).collect(),
            TradeSide::Buy => self
                .class
                .curated_symbols()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn set_side(&mut self, side: TradeSide) {
        self.side = side;
        self.reset_intent();
    }

    pub fn set_class(&mut self, class: AssetClass) {
        self.class = class;
        self.reset_intent();
    }

    fn reset_intent(&mut self) {
        self.asset = None;
        self.quantity = Decimal::ZERO;
        self.reference_price = None;
        self.max_quantity = Decimal::ZERO;
        self.field_error = None;
    }

    /// Pick an asset from the current universe. Selling infers the asset
    /// class from the curated lists and caps quantity at the held amount.
    pub fn select_asset(&mut self, name: &str) -> Result<()> {
        let name = name.to_ascii_uppercase();
        self.quantity = Decimal::ZERO;
        self.reference_price = None;
        self.field_error = None;

        match self.side {
            TradeSide::Sell => {
                let Some(holding) = self.holdings.iter().find(|h| h.name == name) else {
                    self.asset = None;
                    self.max_quantity = Decimal::ZERO;
                    bail!("You do not hold any {name}.");
                };
                self.max_quantity = holding.quantity;
                if let Some(class) = AssetClass::classify_symbol(&name) {
                    self.class = class;
                }
                self.asset = Some(name);
            }
            TradeSide::Buy => {
                if !self.class.curated_symbols().contains(&name.as_str()) {
                    self.asset = None;
                    bail!("{name} is not available for {} trading.", self.class);
                }
                self.max_quantity = Decimal::ZERO;
                self.asset = Some(name);
            }
        }
        Ok(())
    }

    /// Apply a quantity input. Crypto takes any non-negative decimal;
    /// stocks and ETFs only whole numbers. A rejected input records the
    /// field error and leaves the previous valid quantity in place. Sell
    /// quantities are capped at the held amount.
    pub fn set_quantity(&mut self, input: &str) -> Result<()> {
        let input = input.trim();
        let parsed = match self.class {
            AssetClass::Crypto => match input.parse::<Decimal>() {
                Ok(value) if value >= Decimal::ZERO => value,
                _ => return self.reject_quantity("Quantity must be a positive number."),
            },
            AssetClass::Etf | AssetClass::Stocks => {
                if input.contains('.') {
                    return self
                        .reject_quantity("Only whole numbers are allowed for stocks and ETFs.");
                }
                match input.parse::<i64>() {
                    Ok(value) if value >= 0 => Decimal::from(value),
                    _ => return self.reject_quantity("Quantity must be a positive integer."),
                }
            }
        };

        self.quantity = if self.side == TradeSide::Sell && self.asset.is_some() {
            parsed.min(self.max_quantity)
        } else {
            parsed
        };
        self.field_error = None;
        Ok(())
    }

    fn reject_quantity(&mut self, message: &str) -> Result<()> {
        self.field_error = Some(message.to_string());
        bail!("{message}");
    }

    /// Sell-side shortcut: use the whole holding.
    pub fn use_max_quantity(&mut self) {
        if self.side == TradeSide::Sell && self.asset.is_some() {
            self.quantity = self.max_quantity;
            self.field_error = None;
        }
    }

    /// `reference_price × quantity`, zero until both are set.
    pub fn total_price(&self) -> Decimal {
        match self.reference_price {
            Some(price) if self.quantity > Decimal::ZERO => price * self.quantity,
            _ => Decimal::ZERO,
        }
    }

    /// Total rounded to cents, the amount that gets submitted.
    pub fn submission_amount(&self) -> Decimal {
        self.total_price()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The date a daily quote is requested for: crypto trades every day,
    /// everything else uses the last completed trading day.
    pub fn reference_date(&self, today: NaiveDate) -> NaiveDate {
        match self.class {
            AssetClass::Crypto => today,
            AssetClass::Etf | AssetClass::Stocks => adjust_trading_day(today),
        }
    }

    /// Explicit "fetch price" step; never triggered automatically.
    pub async fn fetch_price(
        &mut self,
        market: &MarketDataClient,
        today: NaiveDate,
    ) -> Result<Decimal> {
        let Some(symbol) = self.asset.clone() else {
            bail!("Please select an asset and set a quantity greater than zero.");
        };
        if self.quantity <= Decimal::ZERO {
            bail!("Please select an asset and set a quantity greater than zero.");
        }

        let date = self.reference_date(today);
        let quote = match market.daily_open_close(&symbol, self.class, date).await {
            Ok(quote) => quote,
            Err(e) => {
                self.reference_price = None;
                return Err(e);
            }
        };
        self.apply_quote(&quote)
    }

    /// Pick the reference price out of a daily quote. Crypto prefers the
    /// best closing-trade price the provider reports for the day.
    pub fn apply_quote(&mut self, quote: &DailyOpenClose) -> Result<Decimal> {
        let price = match self.class {
            AssetClass::Crypto => quote.closing_trade_high().or(quote.close),
            AssetClass::Etf | AssetClass::Stocks => quote.close,
        };

        match price {
            Some(price) if price > Decimal::ZERO => {
                self.reference_price = Some(price);
                Ok(price)
            }
            _ => {
                self.reference_price = None;
                bail!("Failed to fetch valid price data.");
            }
        }
    }

    /// Run the execution preconditions in order and build the transaction
    /// payload. Each failure is a hard stop; nothing is partially submitted.
    pub fn build_transaction(
        &self,
        cash_balance: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<NewTransaction> {
        let total = self.total_price();
        if self.reference_price.is_none() || total <= Decimal::ZERO {
            bail!("Price not set or invalid. Please fetch the price before executing the trade.");
        }
        if let Some(error) = &self.field_error {
            bail!("{error}");
        }
        if self.side == TradeSide::Buy && total > cash_balance {
            bail!("Insufficient funds to complete this trade.");
        }

        let Some(asset_name) = self.asset.clone() else {
            bail!("Price not set or invalid. Please fetch the price before executing the trade.");
        };

        Ok(NewTransaction {
            asset_name,
            quantity: self.quantity,
            amount: self.submission_amount(),
            timestamp,
            transaction_type: self.side,
            category: self.class,
        })
    }

    /// Execute: validate, submit, return the created transaction payload.
    pub async fn execute(
        &mut self,
        backend: &BackendClient,
        cash_balance: Decimal,
    ) -> Result<NewTransaction> {
        let tx = self.build_transaction(cash_balance, Utc::now())?;
        backend.create_transaction(&tx).await?;
        Ok(tx)
    }
}
