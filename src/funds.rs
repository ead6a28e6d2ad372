use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Strip the grouping spaces card numbers are usually typed with.
pub fn normalized_card_number(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse an `MM/YY` expiry into the first day of that month.
pub fn parse_expiry(expiry: &str) -> Result<NaiveDate> {
    let (month, year) = expiry
        .split_once('/')
        .context("Invalid expiration date.")?;
    let month: u32 = month.parse().context("Invalid expiration date.")?;
    let year: i32 = year.parse().context("Invalid expiration date.")?;
    if year < 0 || year > 99 {
        bail!("Invalid expiration date.");
    }
    NaiveDate::from_ymd_opt(2000 + year, month, 1).context("Invalid expiration date.")
}

/// Card-form checks gating a deposit, in the order the form reports them.
/// A card counts as expired once the first day of its expiry month has
/// passed.
pub fn validate_card(
    number: &str,
    expiry: &str,
    cvv: &str,
    amount: Decimal,
    today: NaiveDate,
) -> Result<()> {
    let digits = normalized_card_number(number);
    if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("Card number must be 16 digits.");
    }

    let expiry_month = parse_expiry(expiry)?;
    if expiry_month < today.with_day(1).unwrap_or(today) {
        bail!("Card has expired.");
    }

    if !(cvv.len() == 3 || cvv.len() == 4) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        bail!("CVV must be 3 or 4 digits.");
    }

    if amount <= Decimal::ZERO {
        bail!("Amount must be positive.");
    }
    Ok(())
}
