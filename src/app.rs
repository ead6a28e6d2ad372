use crate::api::backend::BackendClient;
use crate::api::images::ImageHostClient;
use crate::api::market_data::{lookback_start, MarketDataClient};
use crate::cli::{
    ChartArgs, Cli, Command, DepositArgs, HistoryArgs, PriceArgs, ProfileArgs,
    ResetPasswordArgs, SignupArgs, TradeArgs,
};
use crate::config::AppConfig;
use crate::funds::validate_card;
use crate::portfolio::{self, LedgerFilter};
use crate::session::{self, SessionStore};
use crate::trade::{adjust_trading_day, Holding, TradeForm};
use crate::types::{AssetClass, TradeSide, UserAsset};
use crate::validation::{
    validate_profile_update, validate_reset_password, validate_signup, ProfileUpdate,
    ResetPasswordRequest, SignupForm,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use dialoguer::{Confirm, Input, Password};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;

pub async fn run(cli: Cli, cfg: AppConfig) -> Result<()> {
    let store = Arc::new(SessionStore::open(&cfg.session.path)?);
    let backend = BackendClient::new(&cfg.backend.base_url, store.clone());
    let market = MarketDataClient::new(&cfg.market_data.base_url, &cfg.market_data.api_key);

    match cli.cmd {
        Command::Login { username } => login(&store, &backend, username).await,
        Command::Logout => logout(&store).await,
        Command::Signup(args) => signup(&cfg, &store, &backend, args).await,
        Command::ResetPassword(args) => reset_password(&backend, args).await,
        Command::Profile(args) => profile(&cfg, &store, &backend, args).await,
        Command::Funds => funds(&store, &backend).await,
        Command::Deposit(args) => deposit(&cfg, &store, &backend, args).await,
        Command::Holdings => holdings(&store, &backend).await,
        Command::Assets => asset_catalog(&store, &backend).await,
        Command::Price(args) => price(&market, args).await,
        Command::Trade(args) => trade(&cfg, &store, &backend, &market, args).await,
        Command::Chart(args) => chart(&market, args).await,
        Command::History(args) => history(&store, &backend, args).await,
        Command::Portfolio => portfolio_report(&store, &backend, &market).await,
        Command::Movers { class } => movers(&market, class).await,
    }
}

async fn require_session(store: &SessionStore) -> Result<()> {
    if !store.is_authenticated().await {
        bail!("Not logged in. Run `papertrade login` first.");
    }
    Ok(())
}

fn usd(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}

// --- auth ---------------------------------------------------------------

async fn login(
    store: &Arc<SessionStore>,
    backend: &BackendClient,
    username: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password: String = Password::new().with_prompt("Password").interact()?;

    let pair = backend.login(&username, &password).await?;
    store.init(pair.access, pair.refresh, None).await?;

    if let Some(user) = backend.fetch_profile().await {
        store.set_user(user).await?;
    }

    println!("Login successful. Welcome back, {username}.");
    Ok(())
}

async fn logout(store: &SessionStore) -> Result<()> {
    store.clear().await?;
    println!("Logged out.");
    Ok(())
}

async fn upload_picture(cfg: &AppConfig, path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read picture {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("profile_picture")
        .to_string();
    let images = ImageHostClient::new(&cfg.images.upload_url, &cfg.images.upload_preset);
    images.upload(&file_name, bytes).await
}

async fn signup(
    cfg: &AppConfig,
    store: &Arc<SessionStore>,
    backend: &BackendClient,
    args: SignupArgs,
) -> Result<()> {
    let password: String = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let profile_picture = match &args.picture {
        Some(path) => Some(upload_picture(cfg, path).await?),
        None => None,
    };

    let form = SignupForm {
        username: args.username,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        phone_number: args.phone_number,
        country: args.country,
        birth_date: args.birth_date,
        confirm_password: password.clone(),
        password,
        profile_picture,
    };
    validate_signup(&form)?;

    let pair = backend.signup(&form).await?;
    store.init(pair.access, pair.refresh, None).await?;
    if let Some(user) = backend.fetch_profile().await {
        store.set_user(user).await?;
    }

    println!("Account created. You are now signed in as {}.", form.username);
    Ok(())
}

async fn reset_password(backend: &BackendClient, args: ResetPasswordArgs) -> Result<()> {
    let password: String = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()?;

    let req = ResetPasswordRequest {
        username: args.username,
        email: args.email,
        phone_number: args.phone_number,
        password,
    };
    validate_reset_password(&req)?;
    backend.reset_password(&req).await?;

    println!("Password reset. Sign in with your new password.");
    Ok(())
}

async fn profile(
    cfg: &AppConfig,
    store: &Arc<SessionStore>,
    backend: &BackendClient,
    args: ProfileArgs,
) -> Result<()> {
    require_session(store).await?;

    let mut update = ProfileUpdate {
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        country: args.country,
        phone_number: args.phone_number,
        birth_date: args.birth_date,
        profile_picture: None,
    };
    if let Some(path) = &args.picture {
        update.profile_picture = Some(upload_picture(cfg, path).await?);
    }

    if !update.is_empty() {
        validate_profile_update(&update)?;
        backend.update_profile(&update).await?;
        println!("Profile updated.");
    }

    let Some(user) = backend.fetch_profile().await else {
        bail!("Could not load your profile. Your session may have expired.");
    };
    store.set_user(user.clone()).await?;

    println!("Username:      {}", user.username);
    println!("Email:         {}", user.email);
    println!("Name:          {} {}", user.first_name, user.last_name);
    println!("Phone:         {}", user.phone_number);
    if let Some(country) = &user.country {
        println!("Country:       {country}");
    }
    if let Some(birth_date) = user.birth_date {
        println!("Birth date:    {birth_date}");
    }
    if let Some(picture) = &user.profile_picture {
        println!("Picture:       {picture}");
    }
    Ok(())
}

// --- funds --------------------------------------------------------------

async fn funds(store: &SessionStore, backend: &BackendClient) -> Result<()> {
    require_session(store).await?;
    let amount = backend.funds().await;
    println!("Total USD in portfolio: {}", usd(amount));
    Ok(())
}

async fn deposit(
    cfg: &AppConfig,
    store: &SessionStore,
    backend: &BackendClient,
    args: DepositArgs,
) -> Result<()> {
    require_session(store).await?;

    let card = match args.card {
        Some(card) => card,
        None => Input::new().with_prompt("Card number").interact_text()?,
    };
    let expiry = match args.expiry {
        Some(expiry) => expiry,
        None => Input::new().with_prompt("Expiry (MM/YY)").interact_text()?,
    };
    let cvv = match args.cvv {
        Some(cvv) => cvv,
        None => Input::new().with_prompt("CVV").interact_text()?,
    };

    validate_card(&card, &expiry, &cvv, args.amount, Local::now().date_naive())?;
    backend.add_funds(args.amount).await?;
    println!("Deposit successful.");

    tokio::time::sleep(cfg.trade.reload_delay()).await;
    println!("Total USD in portfolio: {}", usd(backend.funds().await));
    Ok(())
}

// --- holdings and catalog -------------------------------------------------

fn print_holdings(assets: &[UserAsset]) {
    if assets.is_empty() {
        println!("No assets held.");
        return;
    }
    println!("{:<10} {:<8} {:>16} {:>14}", "Asset", "Class", "Quantity", "Value");
    for asset in assets {
        println!(
            "{:<10} {:<8} {:>16} {:>14}",
            asset.asset_name,
            asset.category.as_str(),
            asset.quantity,
            usd(asset.total_value),
        );
    }
}

async fn holdings(store: &SessionStore, backend: &BackendClient) -> Result<()> {
    require_session(store).await?;
    print_holdings(&backend.user_assets().await);
    Ok(())
}

async fn asset_catalog(store: &SessionStore, backend: &BackendClient) -> Result<()> {
    require_session(store).await?;
    let catalog = backend.asset_catalog().await;
    if catalog.is_empty() {
        println!("No assets listed.");
        return Ok(());
    }
    println!("{:<10} {:<8} {:>12} {:>9} {:>12}", "Asset", "Class", "Price", "Change", "Volume");
    for asset in catalog {
        println!(
            "{:<10} {:<8} {:>12} {:>8}% {:>12}",
            asset.name,
            asset.asset_type,
            asset.price.map(|p| usd(p)).unwrap_or_else(|| "-".into()),
            asset.change.unwrap_or_default(),
            asset.volume,
        );
    }
    Ok(())
}

// --- trading --------------------------------------------------------------

async fn price(market: &MarketDataClient, args: PriceArgs) -> Result<()> {
    let mut form = TradeForm::new(TradeSide::Buy, args.class, Vec::new());
    form.select_asset(&args.symbol)?;
    form.set_quantity(&args.quantity)?;

    let today = Local::now().date_naive();
    let price = form.fetch_price(market, today).await?;

    println!(
        "{} close on {}: {}",
        form.asset().unwrap_or(&args.symbol),
        form.reference_date(today),
        usd(price),
    );
    println!("Total for {} unit(s): {}", form.quantity(), usd(form.submission_amount()));
    Ok(())
}

async fn trade(
    cfg: &AppConfig,
    store: &Arc<SessionStore>,
    backend: &BackendClient,
    market: &MarketDataClient,
    args: TradeArgs,
) -> Result<()> {
    require_session(store).await?;
    let _refresh = session::spawn_refresh(backend.clone(), cfg.session.refresh_interval());

    let class = match (args.side, args.class) {
        (TradeSide::Buy, Some(class)) => class,
        (TradeSide::Buy, None) => bail!("--class is required when buying"),
        // Selling infers the class from the selected holding.
        (TradeSide::Sell, class) => class.unwrap_or(AssetClass::Crypto),
    };

    let user_assets = backend.user_assets().await;
    let holdings: Vec<Holding> = user_assets.iter().map(Holding::from).collect();

    let mut form = TradeForm::new(args.side, class, holdings);
    form.select_asset(&args.symbol)?;
    if args.quantity.eq_ignore_ascii_case("max") {
        form.use_max_quantity();
    } else {
        form.set_quantity(&args.quantity)?;
    }

    let today = Local::now().date_naive();
    let price = form.fetch_price(market, today).await?;
    println!(
        "{} {} {} @ {} (close of {})",
        form.side(),
        form.quantity(),
        form.asset().unwrap_or(&args.symbol),
        usd(price),
        form.reference_date(today),
    );
    println!("Total: {}", usd(form.submission_amount()));

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Execute this trade?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Trade cancelled.");
            return Ok(());
        }
    }

    let cash = backend.funds().await;
    let tx = form.execute(backend, cash).await?;
    println!(
        "Transaction completed: {} {} {} for {}.",
        tx.transaction_type, tx.quantity, tx.asset_name, usd(tx.amount),
    );

    // The server is the ledger of record; wait, then re-fetch everything the
    // trade touched instead of patching local state.
    tokio::time::sleep(cfg.trade.reload_delay()).await;
    println!("Total USD in portfolio: {}", usd(backend.funds().await));
    print_holdings(&backend.user_assets().await);
    Ok(())
}

// --- charts and analytics -------------------------------------------------

async fn chart(market: &MarketDataClient, args: ChartArgs) -> Result<()> {
    let to = Local::now().date_naive();
    let from = lookback_start(args.timeframe, to);

    match market
        .aggregates(&args.symbol, args.class, args.timeframe, from, to)
        .await
    {
        Ok(bars) => {
            println!("{} ({}): {} bars", args.symbol.to_uppercase(), args.class, bars.len());
            for bar in bars {
                let stamp = DateTime::<Utc>::from_timestamp_millis(bar.timestamp_ms)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| bar.timestamp_ms.to_string());
                println!("{stamp}  {}", usd(bar.close));
            }
        }
        Err(e) => {
            tracing::warn!(symbol = %args.symbol, error = ?e, "chart data unavailable");
            println!("{e}");
        }
    }
    Ok(())
}

async fn history(store: &SessionStore, backend: &BackendClient, args: HistoryArgs) -> Result<()> {
    require_session(store).await?;

    let filter = LedgerFilter {
        start: args.from,
        end: args.to,
        asset: args.asset,
    };
    let transactions = backend.transactions().await;
    let mut shown = 0usize;

    println!(
        "{:<20} {:<5} {:<10} {:<8} {:>14} {:>12}",
        "Timestamp", "Side", "Asset", "Class", "Quantity", "Amount"
    );
    for tx in transactions.iter().filter(|tx| filter.matches(tx)) {
        println!(
            "{:<20} {:<5} {:<10} {:<8} {:>14} {:>12}",
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.transaction_type,
            tx.asset_name,
            tx.category.as_str(),
            tx.quantity,
            usd(tx.amount),
        );
        shown += 1;
    }
    if shown == 0 {
        println!("No transactions found.");
    }
    Ok(())
}

fn performance_date(class: AssetClass, today: NaiveDate) -> NaiveDate {
    match class {
        AssetClass::Crypto => today,
        AssetClass::Etf | AssetClass::Stocks => adjust_trading_day(today),
    }
}

async fn portfolio_report(
    store: &SessionStore,
    backend: &BackendClient,
    market: &MarketDataClient,
) -> Result<()> {
    require_session(store).await?;

    let assets = backend.user_assets().await;
    let transactions = backend.transactions().await;
    let today = Local::now().date_naive();

    println!("Allocation");
    for slice in portfolio::allocation(&assets) {
        println!("  {:<8} {}", slice.category.as_str(), usd(slice.total_value));
    }

    println!("\nPerformance");
    for asset in &assets {
        let date = performance_date(asset.category, today);
        match market
            .daily_open_close(&asset.asset_name, asset.category, date)
            .await
        {
            Ok(quote) => {
                let Some(close) = quote.close else {
                    tracing::warn!(asset = %asset.asset_name, "daily quote missing close");
                    continue;
                };
                let perf = portfolio::asset_performance(asset, close);
                println!(
                    "  {:<10} qty {:>12}  invested {:>12}  now {:>12}  P/L {:>12} ({}%)",
                    perf.asset,
                    perf.quantity,
                    usd(perf.investment),
                    usd(perf.current_value),
                    usd(perf.profit),
                    perf.profit_pct,
                );
            }
            Err(e) => {
                tracing::warn!(asset = %asset.asset_name, error = ?e, "failed to fetch quote");
            }
        }
    }

    println!("\nUnrealized P/L");
    let rows = portfolio::unrealized_pnl(&transactions, &assets, &LedgerFilter::default());
    for row in &rows {
        println!(
            "  {:<10} invested {:>12}  earned {:>12}  P/L {:>12} ({}%)  held {:>12}",
            row.asset,
            usd(row.investment),
            usd(row.earnings),
            usd(row.profit_loss),
            row.percentage,
            row.current_quantity,
        );
    }
    if !rows.is_empty() {
        let totals = portfolio::pnl_totals(&rows);
        println!(
            "  {:<10} invested {:>12}  earned {:>12}  P/L {:>12} ({}%)",
            totals.asset,
            usd(totals.investment),
            usd(totals.earnings),
            usd(totals.profit_loss),
            totals.percentage,
        );
    }
    Ok(())
}

async fn movers(market: &MarketDataClient, class: AssetClass) -> Result<()> {
    let today = Local::now().date_naive();
    let date = performance_date(class, today);
    let movers = portfolio::daily_movers(market, class, date).await;

    if movers.is_empty() {
        println!("No quotes available for {class} right now.");
        return Ok(());
    }
    println!("{:<10} {:>12} {:>9}", "Asset", "Price", "Change");
    for mover in movers {
        println!("{:<10} {:>12} {:>8}%", mover.symbol, usd(mover.price), mover.change_pct);
    }
    Ok(())
}
