use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Message shown when a contact channel already belongs to a verified account.
pub const CONTACT_IN_USE_MESSAGE: &str = "We can't create an account with this contact information. \
     Please sign in or recover your account instead.";

/// How a failure should be treated by whoever invoked the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input. Never retried.
    Validation,
    /// Business rule said no. User-facing, not a system error.
    Rejection,
    /// Duplicate registration attempt.
    Precondition,
    /// Directory, store or bot-verification backend failed. Caller may retry.
    BackendUnavailable,
}

/// Lifecycle service error variants.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Username must be a valid UUID string")]
    InvalidUsername,
    #[error("Invalid validation data: reCaptchaToken is required")]
    InvalidValidationData,
    #[error("User identifier is missing.")]
    MissingIdentifier,
    #[error("reCAPTCHA verification failed. please try again.")]
    BotCheckFailed,
    #[error("{}", CONTACT_IN_USE_MESSAGE)]
    ContactInUse,
    #[error("user already registered")]
    AlreadyRegistered,
    #[error("Unable to validate contact information. Please try again.")]
    ContactCheckUnavailable(#[source] anyhow::Error),
    #[error("service temporarily unavailable, please try again")]
    Unavailable(#[from] anyhow::Error),
}

impl LifecycleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUsername | Self::InvalidValidationData | Self::MissingIdentifier => {
                ErrorCategory::Validation
            }
            Self::BotCheckFailed | Self::ContactInUse => ErrorCategory::Rejection,
            Self::AlreadyRegistered => ErrorCategory::Precondition,
            Self::ContactCheckUnavailable(_) | Self::Unavailable(_) => {
                ErrorCategory::BackendUnavailable
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidValidationData => "INVALID_VALIDATION_DATA",
            Self::MissingIdentifier => "MISSING_IDENTIFIER",
            Self::BotCheckFailed => "BOT_CHECK_FAILED",
            Self::ContactInUse => "CONTACT_IN_USE",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::ContactCheckUnavailable(_) => "CONTACT_CHECK_UNAVAILABLE",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Re-label a backend failure raised while checking contacts.
    pub(crate) fn into_contact_check(self) -> Self {
        match self {
            Self::Unavailable(source) => Self::ContactCheckUnavailable(source),
            other => other,
        }
    }
}

impl From<tollgate_domain::username::InvalidUsername> for LifecycleError {
    fn from(_: tollgate_domain::username::InvalidUsername) -> Self {
        Self::InvalidUsername
    }
}

impl IntoResponse for LifecycleError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Rejection if matches!(self, Self::ContactInUse) => StatusCode::CONFLICT,
            ErrorCategory::Rejection => StatusCode::FORBIDDEN,
            ErrorCategory::Precondition => StatusCode::CONFLICT,
            ErrorCategory::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        // Backend detail stays in the logs; the body only carries the stable message.
        match &self {
            Self::ContactCheckUnavailable(e) | Self::Unavailable(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "backend unavailable");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
