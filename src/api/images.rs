use crate::api::models::UploadResponse;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Unsigned multipart upload to the image host; returns the hosted URL that
/// gets stored in the profile.
#[derive(Clone)]
pub struct ImageHostClient {
    upload_url: String,
    upload_preset: String,
    client: Client,
}

impl ImageHostClient {
    pub fn new(upload_url: &str, upload_preset: &str) -> Self {
        Self {
            upload_url: upload_url.to_string(),
            upload_preset: upload_preset.to_string(),
            client: Client::new(),
        }
    }

    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let resp: UploadResponse = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .context("image upload request failed")?
            .error_for_status()
            .context("image host rejected the upload")?
            .json()
            .await
            .context("decode image upload response")?;

        Ok(resp.secure_url)
    }
}
