use anyhow::Context as _;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::domain::repository::BotVerifier;
use crate::error::LifecycleError;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Serialize)]
struct SiteVerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}

#[derive(Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// reCAPTCHA siteverify client.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    pub client: reqwest::Client,
    pub url: String,
}

impl BotVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, secret: &str) -> Result<bool, LifecycleError> {
        let body = serde_qs::to_string(&SiteVerifyRequest {
            secret,
            response: token,
        })
        .context("encode siteverify request")?;
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .context("siteverify request")?
            .error_for_status()
            .context("siteverify status")?;
        let result: SiteVerifyResponse = response
            .json()
            .await
            .context("decode siteverify response")?;
        if !result.success {
            tracing::info!(error_codes = ?result.error_codes, "siteverify declined token");
        }
        Ok(result.success)
    }
}
