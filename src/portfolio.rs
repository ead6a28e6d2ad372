use crate::api::market_data::MarketDataClient;
use crate::types::{AssetClass, Transaction, TradeSide, UserAsset};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlice {
    pub category: AssetClass,
    pub total_value: Decimal,
}

/// Sum of holding values per asset class.
pub fn allocation(assets: &[UserAsset]) -> Vec<AllocationSlice> {
    AssetClass::ALL
        .into_iter()
        .map(|category| AllocationSlice {
            category,
            total_value: assets
                .iter()
                .filter(|a| a.category == category)
                .map(|a| a.total_value)
                .sum(),
        })
        .collect()
}

/// Optional ledger filters: inclusive date range (date-only comparison) and
/// a single asset.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub asset: Option<String>,
}

impl LedgerFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let date = tx.timestamp.date_naive();
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        if let Some(asset) = &self.asset {
            if tx.asset_name != *asset {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetPnl {
    pub asset: String,
    pub investment: Decimal,
    pub earnings: Decimal,
    pub profit_loss: Decimal,
    pub percentage: Decimal,
    pub current_quantity: Decimal,
}

/// Unrealized P/L per asset over the transaction ledger: buys are
/// investment, sells are earnings, the difference is profit, the percentage
/// is taken against the investment (zero investment reports 0%).
pub fn unrealized_pnl(
    transactions: &[Transaction],
    holdings: &[UserAsset],
    filter: &LedgerFilter,
) -> Vec<AssetPnl> {
    let filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .collect();

    let mut assets: Vec<String> = Vec::new();
    for tx in &filtered {
        if !assets.contains(&tx.asset_name) {
            assets.push(tx.asset_name.clone());
        }
    }

    assets
        .into_iter()
        .map(|asset| {
            let investment: Decimal = filtered
                .iter()
                .filter(|tx| tx.asset_name == asset && tx.transaction_type == TradeSide::Buy)
                .map(|tx| tx.amount)
                .sum();
            let earnings: Decimal = filtered
                .iter()
                .filter(|tx| tx.asset_name == asset && tx.transaction_type == TradeSide::Sell)
                .map(|tx| tx.amount)
                .sum();
            let profit_loss = earnings - investment;
            let percentage = if investment.is_zero() {
                Decimal::ZERO
            } else {
                to_cents(profit_loss / investment * Decimal::ONE_HUNDRED)
            };
            let current_quantity = holdings
                .iter()
                .find(|h| h.asset_name == asset)
                .map(|h| h.quantity)
                .unwrap_or(Decimal::ZERO);

            AssetPnl {
                asset,
                investment: to_cents(investment),
                earnings: to_cents(earnings),
                profit_loss: to_cents(profit_loss),
                percentage,
                current_quantity,
            }
        })
        .collect()
}

/// Totals row across a P/L report.
pub fn pnl_totals(rows: &[AssetPnl]) -> AssetPnl {
    let investment: Decimal = rows.iter().map(|r| r.investment).sum();
    let earnings: Decimal = rows.iter().map(|r| r.earnings).sum();
    let profit_loss = earnings - investment;
    let percentage = if investment.is_zero() {
        Decimal::ZERO
    } else {
        to_cents(profit_loss / investment * Decimal::ONE_HUNDRED)
    };
    AssetPnl {
        asset: "Total".to_string(),
        investment,
        earnings,
        profit_loss,
        percentage,
        current_quantity: Decimal::ZERO,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetPerformance {
    pub asset: String,
    pub quantity: Decimal,
    pub investment: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    pub profit_pct: Decimal,
}

/// Mark a holding against its live price: current value, profit over the
/// recorded cost, and profit percentage (zero cost reports 0%).
pub fn asset_performance(asset: &UserAsset, current_price: Decimal) -> AssetPerformance {
    let current_value = current_price * asset.quantity;
    let profit = current_value - asset.total_value;
    let profit_pct = if asset.total_value.is_zero() {
        Decimal::ZERO
    } else {
        to_cents(profit / asset.total_value * Decimal::ONE_HUNDRED)
    };
    AssetPerformance {
        asset: asset.asset_name.clone(),
        quantity: asset.quantity,
        investment: to_cents(asset.total_value),
        current_value: to_cents(current_value),
        profit: to_cents(profit),
        profit_pct,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyMover {
    pub symbol: String,
    pub price: Decimal,
    pub change_pct: Decimal,
}

/// Day-over-day change of a single quote.
pub fn daily_change_pct(open: Decimal, close: Decimal) -> Decimal {
    if open.is_zero() {
        return Decimal::ZERO;
    }
    to_cents((close - open) / open * Decimal::ONE_HUNDRED)
}

/// Previous-day movement for every curated symbol of a class. Symbols whose
/// quote cannot be fetched are skipped with a warning; one bad symbol never
/// empties the view.
pub async fn daily_movers(
    market: &MarketDataClient,
    class: AssetClass,
    date: NaiveDate,
) -> Vec<DailyMover> {
    let mut movers = Vec::new();
    for symbol in class.curated_symbols() {
        match market.daily_open_close(symbol, class, date).await {
            Ok(quote) => {
                if let (Some(open), Some(close)) = (quote.open, quote.close) {
                    movers.push(DailyMover {
                        symbol: symbol.to_string(),
                        price: to_cents(close),
                        change_pct: daily_change_pct(open, close),
                    });
                }
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = ?e, "failed to fetch daily quote");
            }
        }
    }
    movers
}
