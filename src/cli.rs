use crate::types::{AssetClass, Timeframe, TradeSide};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

pub fn parse_asset_class(s: &str) -> Result<AssetClass, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

pub fn parse_side(s: &str) -> Result<TradeSide, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

pub fn parse_timeframe(s: &str) -> Result<Timeframe, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    s.parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{s}': {e}"))
}

#[derive(Parser)]
#[command(
    name = "papertrade",
    version,
    about = "Track a virtual portfolio and trade against live market prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and store a session
    Login {
        #[arg(long, env = "PAPERTRADE_USERNAME")]
        username: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Create an account
    Signup(SignupArgs),

    /// Reset the account password
    ResetPassword(ResetPasswordArgs),

    /// Show the user profile, or update the given fields
    Profile(ProfileArgs),

    /// Show the cash balance
    Funds,

    /// Deposit funds with a card
    Deposit(DepositArgs),

    /// List current holdings
    Holdings,

    /// List the server-side asset catalog
    Assets,

    /// Fetch a reference price and total for an asset
    Price(PriceArgs),

    /// Execute a simulated trade
    Trade(TradeArgs),

    /// Print a closing-price series for an asset
    Chart(ChartArgs),

    /// List transactions, optionally filtered
    History(HistoryArgs),

    /// Portfolio analytics: allocation, performance and unrealized P/L
    Portfolio,

    /// Previous-day movers for a curated asset class
    Movers {
        #[arg(value_parser = parse_asset_class)]
        class: AssetClass,
    },
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub phone_number: String,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub birth_date: Option<NaiveDate>,
    /// Path to the profile picture to upload
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResetPasswordArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone_number: String,
}

#[derive(Args, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub phone_number: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub birth_date: Option<NaiveDate>,
    /// Path to a new profile picture to upload
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

#[derive(Args)]
pub struct DepositArgs {
    #[arg(value_parser = parse_amount)]
    pub amount: Decimal,
    /// Card number, 16 digits (spaces allowed)
    #[arg(long)]
    pub card: Option<String>,
    /// Expiry as MM/YY
    #[arg(long)]
    pub expiry: Option<String>,
    #[arg(long)]
    pub cvv: Option<String>,
}

#[derive(Args)]
pub struct PriceArgs {
    #[arg(value_parser = parse_asset_class)]
    pub class: AssetClass,
    pub symbol: String,
    #[arg(default_value = "1")]
    pub quantity: String,
}

#[derive(Args)]
pub struct TradeArgs {
    #[arg(value_parser = parse_side)]
    pub side: TradeSide,
    pub symbol: String,
    pub quantity: String,
    /// Asset class; required when buying, inferred from holdings when selling
    #[arg(long, value_parser = parse_asset_class)]
    pub class: Option<AssetClass>,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ChartArgs {
    #[arg(value_parser = parse_asset_class)]
    pub class: AssetClass,
    pub symbol: String,
    #[arg(long, default_value = "day", value_parser = parse_timeframe)]
    pub timeframe: Timeframe,
}

#[derive(Args, Default)]
pub struct HistoryArgs {
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub asset: Option<String>,
}
