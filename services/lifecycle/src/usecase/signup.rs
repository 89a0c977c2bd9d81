use chrono::{DateTime, Utc};

use tollgate_domain::username::validate_username;

use crate::domain::repository::{BotVerifier, DirectoryPort, UnverifiedUserStore};
use crate::domain::types::PreSignUpEvent;
use crate::error::LifecycleError;
use crate::usecase::registry::{RegisterUnverifiedUserUseCase, UserIdentity};
use crate::usecase::uniqueness::EnforceContactUniquenessUseCase;

/// Gate for account creation:
/// username format → bot check → contact uniqueness → registration.
///
/// Stages run in that order and the first failure ends the pipeline. Only
/// registration writes anything, so an early failure leaves nothing to undo.
pub struct ValidateSignupUseCase<D, S, B>
where
    D: DirectoryPort,
    S: UnverifiedUserStore,
    B: BotVerifier,
{
    pub directory: D,
    pub store: S,
    pub bot_verifier: B,
    pub bot_secret: String,
    pub ttl_minutes: u32,
}

impl<D, S, B> ValidateSignupUseCase<D, S, B>
where
    D: DirectoryPort,
    S: UnverifiedUserStore,
    B: BotVerifier,
{
    pub async fn execute(
        &self,
        mut event: PreSignUpEvent,
        now: DateTime<Utc>,
    ) -> Result<PreSignUpEvent, LifecycleError> {
        // 1. Username format, checked before any network call
        validate_username(&event.user_name)?;

        // 2. Bot verification
        let token = event
            .request
            .bot_token()
            .ok_or(LifecycleError::InvalidValidationData)?;
        if !self.bot_verifier.verify(token, &self.bot_secret).await? {
            tracing::info!(username = %event.user_name, "bot verification rejected sign-up");
            return Err(LifecycleError::BotCheckFailed);
        }

        // 3. Contact uniqueness
        EnforceContactUniquenessUseCase {
            directory: &self.directory,
        }
        .execute(&event.request.user_attributes)
        .await?;

        // 4. Registration
        RegisterUnverifiedUserUseCase {
            store: &self.store,
            ttl_minutes: self.ttl_minutes,
        }
        .execute(
            UserIdentity {
                username: &event.user_name,
                attributes: &event.request.user_attributes,
            },
            now,
        )
        .await?;

        event.response.require_manual_verification();
        Ok(event)
    }
}
