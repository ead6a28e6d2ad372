use chrono::NaiveDate;
use papertrade::api::market_data::{lookback_start, provider_symbol};
use papertrade::types::{AssetClass, Timeframe};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn crypto_symbols_are_rewritten_to_the_usd_pair_form() {
    assert_eq!(provider_symbol("BTC", AssetClass::Crypto), "X:BTCUSD");
    assert_eq!(provider_symbol("eth", AssetClass::Crypto), "X:ETHUSD");
}

#[test]
fn equity_and_etf_symbols_pass_through_unchanged() {
    assert_eq!(provider_symbol("AAPL", AssetClass::Stocks), "AAPL");
    assert_eq!(provider_symbol("spy", AssetClass::Etf), "SPY");
    assert_eq!(provider_symbol("BRK.B", AssetClass::Stocks), "BRK.B");
}

#[test]
fn each_timeframe_has_its_fixed_lookback_window() {
    let today = date(2024, 6, 15);
    assert_eq!(lookback_start(Timeframe::Hour, today), date(2024, 6, 5));
    assert_eq!(lookback_start(Timeframe::Day, today), date(2024, 4, 26));
    assert_eq!(lookback_start(Timeframe::Week, today), date(2023, 11, 18));
    assert_eq!(lookback_start(Timeframe::Month, today), date(2022, 10, 15));
    assert_eq!(lookback_start(Timeframe::Year, today), date(2018, 6, 15));
}

#[test]
fn timeframes_parse_from_their_wire_names() {
    assert_eq!("day".parse::<Timeframe>().unwrap(), Timeframe::Day);
    assert_eq!("YEAR".parse::<Timeframe>().unwrap(), Timeframe::Year);
    assert!("fortnight".parse::<Timeframe>().is_err());
}
