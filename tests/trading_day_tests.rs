use chrono::{Datelike, NaiveDate, Weekday};
use papertrade::trade::adjust_trading_day;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sunday_goes_back_two_days() {
    let sunday = date(2024, 3, 10);
    assert_eq!(sunday.weekday(), Weekday::Sun);
    assert_eq!(adjust_trading_day(sunday), date(2024, 3, 8));
}

#[test]
fn monday_goes_back_three_days() {
    let monday = date(2024, 3, 11);
    assert_eq!(monday.weekday(), Weekday::Mon);
    assert_eq!(adjust_trading_day(monday), date(2024, 3, 8));
}

#[test]
fn tuesday_through_saturday_go_back_one_day() {
    for day in 12..=16 {
        let d = date(2024, 3, day);
        assert!(!matches!(d.weekday(), Weekday::Sun | Weekday::Mon));
        assert_eq!(adjust_trading_day(d), date(2024, 3, day - 1));
    }
    let saturday = date(2024, 3, 9);
    assert_eq!(saturday.weekday(), Weekday::Sat);
    assert_eq!(adjust_trading_day(saturday), date(2024, 3, 8));
}

#[test]
fn adjustment_crosses_month_boundaries() {
    // 2024-04-01 is a Monday; three days back lands in March.
    let monday = date(2024, 4, 1);
    assert_eq!(monday.weekday(), Weekday::Mon);
    assert_eq!(adjust_trading_day(monday), date(2024, 3, 29));
}
