use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::domain::types::{PostConfirmationEvent, PreSignUpEvent};
use crate::error::LifecycleError;
use crate::state::AppState;
use crate::usecase::registry::{MarkVerifiedUseCase, UserIdentity};
use crate::usecase::signup::ValidateSignupUseCase;

// ── POST /triggers/pre-sign-up ───────────────────────────────────────────────

/// Returns the event with its response flags cleared; the directory proceeds
/// with account creation only on 200.
pub async fn pre_sign_up(
    State(state): State<AppState>,
    Json(event): Json<PreSignUpEvent>,
) -> Result<Json<PreSignUpEvent>, LifecycleError> {
    let usecase = ValidateSignupUseCase {
        directory: state.directory(),
        store: state.store(),
        bot_verifier: state.bot_verifier(),
        bot_secret: state.recaptcha_secret.clone(),
        ttl_minutes: state.ttl_minutes,
    };
    let event = usecase.execute(event, Utc::now()).await?;
    Ok(Json(event))
}

// ── POST /triggers/post-confirmation ─────────────────────────────────────────

/// Marks the record registered at sign-up as verified: keyed by `sub`, else the username.
pub async fn post_confirmation(
    State(state): State<AppState>,
    Json(event): Json<PostConfirmationEvent>,
) -> Result<StatusCode, LifecycleError> {
    let usecase = MarkVerifiedUseCase {
        store: state.store(),
    };
    let identity = UserIdentity {
        username: &event.user_name,
        attributes: &event.request.user_attributes,
    };
    usecase.execute(identity, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}
