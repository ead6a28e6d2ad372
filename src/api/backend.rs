use crate::api::models::{FundsResponse, TokenPair};
use crate::session::SessionStore;
use crate::types::{CatalogAsset, NewTransaction, Transaction, UserAsset, UserProfile};
use crate::validation::{validate_login, ProfileUpdate, ResetPasswordRequest, SignupForm};
use anyhow::{bail, Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// REST client for the application backend. Authenticated reads degrade to a
/// safe default: a 401 discards the cached user, any other failure is logged,
/// and the caller gets an empty/zero value. Writes surface their error.
/// Nothing is retried.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
    session: Arc<SessionStore>,
}

impl BackendClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // --- auth -----------------------------------------------------------

    /// `POST /login`. Field validation runs first; an invalid form never
    /// reaches the network.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        validate_login(username, password)?;

        let resp = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .context("login request failed")?;

        if !resp.status().is_success() {
            bail!("Failed to log in: Wrong username or password.");
        }
        resp.json().await.context("decode login response")
    }

    /// `POST /signup` (multipart). The profile picture is uploaded to the
    /// image host beforehand; only its URL travels here.
    pub async fn signup(&self, form: &SignupForm) -> Result<TokenPair> {
        let mut multipart = Form::new()
            .text("username", form.username.clone())
            .text("email", form.email.clone())
            .text("first_name", form.first_name.clone())
            .text("last_name", form.last_name.clone())
            .text("phone_number", form.phone_number.clone())
            .text("password", form.password.clone());
        if let Some(country) = &form.country {
            multipart = multipart.text("country", country.clone());
        }
        if let Some(birth_date) = form.birth_date {
            multipart = multipart.text("birth_date", birth_date.format("%Y-%m-%d").to_string());
        }
        if let Some(picture) = &form.profile_picture {
            multipart = multipart.text("profile_picture", picture.clone());
        }

        let resp = self
            .client
            .post(self.url("/signup"))
            .multipart(multipart)
            .send()
            .await
            .context("signup request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("signup rejected ({status}): {body}");
        }
        resp.json().await.context("decode signup response")
    }

    /// `POST /token/refresh`: exchange the stored refresh token for a new
    /// access/refresh pair and persist both.
    pub async fn refresh_session(&self) -> Result<()> {
        let refresh_token = self
            .session
            .refresh_token()
            .await
            .context("no session to refresh")?;

        let pair: TokenPair = self
            .client
            .post(self.url("/token/refresh"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("token refresh request failed")?
            .error_for_status()
            .context("token refresh rejected")?
            .json()
            .await
            .context("decode token refresh response")?;

        self.session.refresh(pair.access, pair.refresh).await
    }

    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/reset-password"))
            .json(&serde_json::json!({
                "username": req.username,
                "email": req.email,
                "phone_number": req.phone_number,
                "password": req.password,
            }))
            .send()
            .await
            .context("reset-password request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("password reset rejected ({status}): {body}");
        }
        Ok(())
    }

    // --- degrading reads ------------------------------------------------

    /// Authenticated GET that maps 401 (or a missing session) to `None`.
    async fn get_authenticated<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let Some(token) = self.session.access_token().await else {
            return Ok(None);
        };

        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            self.session.discard_user().await;
            return Ok(None);
        }

        let resp = resp
            .error_for_status()
            .with_context(|| format!("GET {path} rejected"))?;
        Ok(Some(resp.json().await.with_context(|| format!("decode {path} response"))?))
    }

    /// `GET /user-funds`, degraded to a zero balance.
    pub async fn funds(&self) -> Decimal {
        match self.get_authenticated::<FundsResponse>("/user-funds").await {
            Ok(Some(f)) => f.amount,
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to fetch user funds");
                Decimal::ZERO
            }
        }
    }

    /// `GET /user-assets`, degraded to an empty list.
    pub async fn user_assets(&self) -> Vec<UserAsset> {
        match self.get_authenticated::<Vec<UserAsset>>("/user-assets").await {
            Ok(Some(assets)) => assets,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to fetch user assets");
                Vec::new()
            }
        }
    }

    /// `GET /assets`, degraded to an empty list.
    pub async fn asset_catalog(&self) -> Vec<CatalogAsset> {
        match self.get_authenticated::<Vec<CatalogAsset>>("/assets").await {
            Ok(Some(assets)) => assets,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to fetch asset catalog");
                Vec::new()
            }
        }
    }

    /// `GET /transactions/list`, degraded to an empty list.
    pub async fn transactions(&self) -> Vec<Transaction> {
        match self
            .get_authenticated::<Vec<Transaction>>("/transactions/list")
            .await
        {
            Ok(Some(txs)) => txs,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to fetch transactions");
                Vec::new()
            }
        }
    }

    /// `GET /user`, degraded to `None`.
    pub async fn fetch_profile(&self) -> Option<UserProfile> {
        match self.get_authenticated::<UserProfile>("/user").await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to fetch profile");
                None
            }
        }
    }

    // --- writes ---------------------------------------------------------

    async fn bearer(&self) -> Result<String> {
        self.session
            .access_token()
            .await
            .context("not logged in")
    }

    /// `POST /user-funds`: deposit into the simulated cash balance.
    pub async fn add_funds(&self, amount: Decimal) -> Result<()> {
        let token = self.bearer().await?;
        self.client
            .post(self.url("/user-funds"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await
            .context("deposit request failed")?
            .error_for_status()
            .context("deposit rejected")?;
        Ok(())
    }

    /// `POST /transactions/create`.
    pub async fn create_transaction(&self, tx: &NewTransaction) -> Result<()> {
        let token = self.bearer().await?;
        self.client
            .post(self.url("/transactions/create"))
            .bearer_auth(token)
            .json(tx)
            .send()
            .await
            .context("transaction request failed")?
            .error_for_status()
            .context("transaction rejected")?;
        Ok(())
    }

    /// `PUT /user` (multipart), fields that are `None` are left untouched.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let token = self.bearer().await?;

        let mut multipart = Form::new();
        for (field, value) in [
            ("email", &update.email),
            ("first_name", &update.first_name),
            ("last_name", &update.last_name),
            ("country", &update.country),
            ("phone_number", &update.phone_number),
            ("profile_picture", &update.profile_picture),
        ] {
            if let Some(value) = value {
                multipart = multipart.text(field, value.clone());
            }
        }
        if let Some(birth_date) = update.birth_date {
            multipart = multipart.text("birth_date", birth_date.format("%Y-%m-%d").to_string());
        }

        self.client
            .put(self.url("/user"))
            .bearer_auth(token)
            .multipart(multipart)
            .send()
            .await
            .context("profile update request failed")?
            .error_for_status()
            .context("profile update rejected")?;
        Ok(())
    }
}
