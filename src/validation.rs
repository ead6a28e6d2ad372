use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Client-side login check. Runs before any network call; an invalid form
/// never reaches the backend.
pub fn validate_login(username: &str, password: &str) -> Result<()> {
    if username.is_empty() {
        bail!("Username is required");
    }
    if password.is_empty() {
        bail!("Password is required");
    }
    if password.chars().count() < 8 {
        bail!("Password must be at least 8 characters long");
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c))
    {
        return false;
    }
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub country: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub password: String,
    pub confirm_password: String,
    /// Hosted picture URL, filled in after the image-host upload.
    pub profile_picture: Option<String>,
}

pub fn validate_signup(form: &SignupForm) -> Result<()> {
    if form.username.is_empty() {
        bail!("Username is required");
    }
    if form.email.is_empty() {
        bail!("Email is required");
    }
    if !is_valid_email(&form.email) {
        bail!("Invalid email format");
    }
    if form.first_name.is_empty() {
        bail!("First name is required");
    }
    if form.last_name.is_empty() {
        bail!("Last name is required");
    }
    if form.phone_number.is_empty() {
        bail!("Phone number is required");
    }
    if !is_valid_phone(&form.phone_number) {
        bail!("Phone number must be 10 digits");
    }
    if form.birth_date.is_none() {
        bail!("Birth date is required");
    }
    if form.password.chars().count() < 8 {
        bail!("Password must be at least 8 characters");
    }
    if form.password != form.confirm_password {
        bail!("Passwords do not match");
    }
    if form.profile_picture.is_none() {
        bail!("Profile picture is required.");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

pub fn validate_reset_password(req: &ResetPasswordRequest) -> Result<()> {
    if req.username.is_empty() {
        bail!("Username is required");
    }
    if req.email.is_empty() {
        bail!("Email is required");
    }
    if !is_valid_email(&req.email) {
        bail!("Invalid email format");
    }
    if req.phone_number.is_empty() {
        bail!("Phone number is required");
    }
    if !is_valid_phone(&req.phone_number) {
        bail!("Phone number must be 10 digits");
    }
    if req.password.is_empty() {
        bail!("Password is required");
    }
    if req.password.chars().count() < 8 {
        bail!("Password must be at least 8 characters long");
    }
    Ok(())
}

/// Partial profile update; `None` fields are left untouched server-side.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.country.is_none()
            && self.phone_number.is_none()
            && self.birth_date.is_none()
            && self.profile_picture.is_none()
    }
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<()> {
    if let Some(email) = &update.email {
        if !is_valid_email(email) {
            bail!("Invalid email format");
        }
    }
    if let Some(phone) = &update.phone_number {
        if !is_valid_phone(phone) {
            bail!("Phone number must be 10 digits");
        }
    }
    Ok(())
}
