use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tollgate_domain::directory::UserAttributes;

/// Page size for every directory search.
pub const DIRECTORY_PAGE_LIMIT: u32 = 60;

/// Key under which clients send the bot-verification token.
pub const BOT_TOKEN_FIELD: &str = "reCaptchaToken";

/// Lifecycle record for an account that has not finished verification.
///
/// Timestamps are epoch seconds. `expires_at` doubles as the local store's
/// own TTL, so an orphaned record is eventually reclaimed even if cleanup crashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedUserRecord {
    pub user_id: String,
    pub created_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub verified_at: Option<i64>,
}

impl UnverifiedUserRecord {
    pub fn new_unverified(user_id: String, now: DateTime<Utc>, ttl_minutes: u32) -> Self {
        Self {
            user_id,
            created_at: Some(now.timestamp()),
            expires_at: Some((now + Duration::minutes(i64::from(ttl_minutes))).timestamp()),
            verified_at: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// A directory account eligible for reclamation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleCandidate {
    pub username: String,
    #[serde(serialize_with = "tollgate_core::serde::to_rfc3339_ms")]
    pub user_create_date: DateTime<Utc>,
}

// ── Pre sign-up trigger event ────────────────────────────────────────────────

/// Pre sign-up trigger payload. Fields this service does not read are carried
/// through untouched so the mutated event can be handed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSignUpEvent {
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_pool_id: Option<String>,
    pub request: PreSignUpRequest,
    #[serde(default)]
    pub response: PreSignUpResponse,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSignUpRequest {
    #[serde(default)]
    pub user_attributes: UserAttributes,
    #[serde(default)]
    pub validation_data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub client_metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl PreSignUpRequest {
    /// Bot token from validation data, falling back to client metadata. Empty counts as absent.
    pub fn bot_token(&self) -> Option<&str> {
        [&self.validation_data, &self.client_metadata]
            .into_iter()
            .flatten()
            .filter_map(|data| data.get(BOT_TOKEN_FIELD).and_then(|v| v.as_str()))
            .find(|token| !token.is_empty())
    }
}

/// Response flags read by the directory after the trigger returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSignUpResponse {
    #[serde(default)]
    pub auto_confirm_user: bool,
    #[serde(default)]
    pub auto_verify_email: bool,
    #[serde(default)]
    pub auto_verify_phone: bool,
}

impl PreSignUpResponse {
    /// New accounts must not be treated as already trusted.
    pub fn require_manual_verification(&mut self) {
        self.auto_confirm_user = false;
        self.auto_verify_email = false;
        self.auto_verify_phone = false;
    }
}

// ── Post-confirmation trigger event ──────────────────────────────────────────

/// Post-confirmation trigger payload. `request.userAttributes` carries the
/// subject id the record was registered under.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationEvent {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub request: PostConfirmationRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationRequest {
    #[serde(default)]
    pub user_attributes: UserAttributes,
}
