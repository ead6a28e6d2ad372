use chrono::NaiveDate;
use papertrade::funds::validate_card;
use papertrade::validation::{
    is_valid_email, is_valid_phone, validate_login, validate_reset_password, validate_signup,
    ResetPasswordRequest, SignupForm,
};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn login_requires_username_and_a_long_enough_password() {
    assert_eq!(
        validate_login("", "whatever").unwrap_err().to_string(),
        "Username is required"
    );
    assert_eq!(
        validate_login("bob", "").unwrap_err().to_string(),
        "Password is required"
    );
    assert_eq!(
        validate_login("bob", "short").unwrap_err().to_string(),
        "Password must be at least 8 characters long"
    );
    assert!(validate_login("bob", "longenough").is_ok());
}

#[test]
fn email_validation_accepts_ordinary_addresses() {
    assert!(is_valid_email("user@example.com"));
    assert!(is_valid_email("first.last+tag@sub.domain.org"));
    assert!(!is_valid_email("not-an-email"));
    assert!(!is_valid_email("user@"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("user@example"));
    assert!(!is_valid_email("user@example.toolongtld"));
}

#[test]
fn phone_numbers_are_exactly_ten_digits() {
    assert!(is_valid_phone("0123456789"));
    assert!(!is_valid_phone("12345"));
    assert!(!is_valid_phone("123456789012"));
    assert!(!is_valid_phone("12345abcde"));
}

fn signup_form() -> SignupForm {
    SignupForm {
        username: "alice".into(),
        email: "alice@example.com".into(),
        first_name: "Alice".into(),
        last_name: "Smith".into(),
        phone_number: "5551234567".into(),
        country: None,
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 2),
        password: "longenough".into(),
        confirm_password: "longenough".into(),
        profile_picture: Some("https://img.example/alice.png".into()),
    }
}

#[test]
fn signup_checks_each_field_in_order() {
    assert!(validate_signup(&signup_form()).is_ok());

    let mut form = signup_form();
    form.email = "bad".into();
    assert_eq!(
        validate_signup(&form).unwrap_err().to_string(),
        "Invalid email format"
    );

    let mut form = signup_form();
    form.phone_number = "123".into();
    assert_eq!(
        validate_signup(&form).unwrap_err().to_string(),
        "Phone number must be 10 digits"
    );

    let mut form = signup_form();
    form.confirm_password = "different1".into();
    assert_eq!(
        validate_signup(&form).unwrap_err().to_string(),
        "Passwords do not match"
    );

    let mut form = signup_form();
    form.profile_picture = None;
    assert_eq!(
        validate_signup(&form).unwrap_err().to_string(),
        "Profile picture is required."
    );
}

#[test]
fn reset_password_requires_every_identity_field() {
    let req = ResetPasswordRequest {
        username: "alice".into(),
        email: "alice@example.com".into(),
        phone_number: "5551234567".into(),
        password: "longenough".into(),
    };
    assert!(validate_reset_password(&req).is_ok());

    let mut bad = req.clone();
    bad.password = "short".into();
    assert_eq!(
        validate_reset_password(&bad).unwrap_err().to_string(),
        "Password must be at least 8 characters long"
    );
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[test]
fn card_validation_accepts_a_well_formed_deposit() {
    assert!(validate_card("4242 4242 4242 4242", "12/99", "123", dec("25"), today()).is_ok());
    assert!(validate_card("4242424242424242", "06/24", "1234", dec("0.01"), today()).is_ok());
}

#[test]
fn card_validation_rejects_each_bad_field_with_its_message() {
    assert_eq!(
        validate_card("1234", "12/99", "123", dec("25"), today())
            .unwrap_err()
            .to_string(),
        "Card number must be 16 digits."
    );
    assert_eq!(
        validate_card("4242424242424242", "01/20", "123", dec("25"), today())
            .unwrap_err()
            .to_string(),
        "Card has expired."
    );
    assert_eq!(
        validate_card("4242424242424242", "13/99", "123", dec("25"), today())
            .unwrap_err()
            .to_string(),
        "Invalid expiration date."
    );
    assert_eq!(
        validate_card("4242424242424242", "12/99", "12", dec("25"), today())
            .unwrap_err()
            .to_string(),
        "CVV must be 3 or 4 digits."
    );
    assert_eq!(
        validate_card("4242424242424242", "12/99", "123", Decimal::ZERO, today())
            .unwrap_err()
            .to_string(),
        "Amount must be positive."
    );
}
