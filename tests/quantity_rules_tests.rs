use papertrade::trade::{Holding, TradeForm};
use papertrade::types::{AssetClass, TradeSide};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn crypto_accepts_any_non_negative_decimal() {
    let mut form = TradeForm::new(TradeSide::Buy, AssetClass::Crypto, vec![]);
    form.select_asset("BTC").unwrap();

    form.set_quantity("1.5").unwrap();
    assert_eq!(form.quantity(), Decimal::from_str("1.5").unwrap());

    form.set_quantity("0").unwrap();
    assert_eq!(form.quantity(), Decimal::ZERO);
    assert!(form.field_error().is_none());
}

#[test]
fn crypto_rejects_negative_and_non_numeric_keeping_prior_quantity() {
    let mut form = TradeForm::new(TradeSide::Buy, AssetClass::Crypto, vec![]);
    form.select_asset("ETH").unwrap();
    form.set_quantity("2.25").unwrap();

    let err = form.set_quantity("-1").unwrap_err();
    assert_eq!(err.to_string(), "Quantity must be a positive number.");
    assert_eq!(form.quantity(), Decimal::from_str("2.25").unwrap());

    let err = form.set_quantity("abc").unwrap_err();
    assert_eq!(err.to_string(), "Quantity must be a positive number.");
    assert_eq!(form.quantity(), Decimal::from_str("2.25").unwrap());
    assert!(form.field_error().is_some());
}

#[test]
fn whole_number_classes_reject_any_input_containing_a_dot() {
    for (class, symbol) in [(AssetClass::Etf, "SPY"), (AssetClass::Stocks, "AAPL")] {
        let mut form = TradeForm::new(TradeSide::Buy, class, vec![]);
        form.select_asset(symbol).unwrap();
        form.set_quantity("3").unwrap();

        // Rejected on the dot alone, even when the value is whole.
        for input in ["2.0", "1.5", "10."] {
            let err = form.set_quantity(input).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Only whole numbers are allowed for stocks and ETFs."
            );
            assert_eq!(form.quantity(), Decimal::from(3));
        }

        let err = form.set_quantity("-2").unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be a positive integer.");
        assert_eq!(form.quantity(), Decimal::from(3));
    }
}

#[test]
fn sell_quantity_is_capped_at_the_held_amount() {
    let holdings = vec![Holding {
        name: "BTC".into(),
        quantity: Decimal::from_str("2.5").unwrap(),
    }];
    let mut form = TradeForm::new(TradeSide::Sell, AssetClass::Crypto, holdings);
    form.select_asset("BTC").unwrap();
    assert_eq!(form.max_quantity(), Decimal::from_str("2.5").unwrap());

    form.set_quantity("10").unwrap();
    assert_eq!(form.quantity(), Decimal::from_str("2.5").unwrap());
}

#[test]
fn max_quantity_action_clamps_to_exactly_the_holding() {
    let holdings = vec![Holding {
        name: "SOL".into(),
        quantity: Decimal::from_str("17.25").unwrap(),
    }];
    let mut form = TradeForm::new(TradeSide::Sell, AssetClass::Crypto, holdings);
    form.select_asset("SOL").unwrap();

    form.use_max_quantity();
    assert_eq!(form.quantity(), Decimal::from_str("17.25").unwrap());
}

#[test]
fn max_quantity_action_is_a_no_op_when_buying() {
    let mut form = TradeForm::new(TradeSide::Buy, AssetClass::Crypto, vec![]);
    form.select_asset("BTC").unwrap();
    form.use_max_quantity();
    assert_eq!(form.quantity(), Decimal::ZERO);
}
