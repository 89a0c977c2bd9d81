use sea_orm::DatabaseConnection;

use crate::infra::captcha::RecaptchaVerifier;
use crate::infra::db::{DbDirectory, DbUnverifiedUserStore};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub pool_id: String,
    pub recaptcha_secret: String,
    pub recaptcha_verify_url: String,
    pub ttl_minutes: u32,
    pub grace_period_hours: u32,
}

impl AppState {
    pub fn directory(&self) -> DbDirectory {
        DbDirectory {
            db: self.db.clone(),
            pool_id: self.pool_id.clone(),
        }
    }

    pub fn store(&self) -> DbUnverifiedUserStore {
        DbUnverifiedUserStore {
            db: self.db.clone(),
        }
    }

    pub fn bot_verifier(&self) -> RecaptchaVerifier {
        RecaptchaVerifier {
            client: self.http.clone(),
            url: self.recaptcha_verify_url.clone(),
        }
    }
}
