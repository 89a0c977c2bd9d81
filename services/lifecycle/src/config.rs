use serde::Deserialize;

use tollgate_core::config::Config;

use crate::infra::captcha::DEFAULT_VERIFY_URL;

/// Lifecycle service configuration. Each field is read from its upper-cased env var.
#[derive(Debug, Deserialize)]
pub struct LifecycleConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120).
    #[serde(default = "default_port")]
    pub lifecycle_port: u16,
    /// Directory user pool whose accounts this service gates and reclaims.
    pub directory_pool_id: String,
    /// Lifetime of an unverified record, in minutes (default 1440).
    #[serde(default = "default_expire_minutes")]
    pub expire_unverified_users_minutes: u32,
    /// Minimum account age before cleanup may reclaim it, in hours (default 24).
    #[serde(default = "default_grace_hours")]
    pub cleanup_grace_period_hours: u32,
    pub recaptcha_secret_key: String,
    #[serde(default = "default_verify_url")]
    pub recaptcha_verify_url: String,
}

impl Config for LifecycleConfig {}

impl LifecycleConfig {
    /// Reject values that deserialize but cannot drive the lifecycle.
    pub fn validate(self) -> anyhow::Result<Self> {
        anyhow::ensure!(
            self.expire_unverified_users_minutes > 0,
            "EXPIRE_UNVERIFIED_USERS_MINUTES must be at least 1"
        );
        anyhow::ensure!(
            !self.directory_pool_id.is_empty(),
            "DIRECTORY_POOL_ID must not be empty"
        );
        Ok(self)
    }
}

fn default_port() -> u16 {
    3120
}

fn default_expire_minutes() -> u32 {
    1440
}

fn default_grace_hours() -> u32 {
    24
}

fn default_verify_url() -> String {
    DEFAULT_VERIFY_URL.to_owned()
}
