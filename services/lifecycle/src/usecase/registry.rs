use chrono::{DateTime, Duration, Utc};

use tollgate_domain::directory::{DirectoryFilter, DirectoryUser, UserAttributes, UserStatus};
use tollgate_domain::pagination::{Page, PaginationCursor};

use crate::domain::repository::{DirectoryPort, UnverifiedUserStore};
use crate::domain::types::{StaleCandidate, UnverifiedUserRecord};
use crate::error::LifecycleError;
use crate::usecase::scanner::DirectoryScanner;

// ── RegisterUnverifiedUser ───────────────────────────────────────────────────

/// Who a trigger is about. Registration and verification resolve the record key the same way.
pub struct UserIdentity<'a> {
    pub username: &'a str,
    pub attributes: &'a UserAttributes,
}

impl UserIdentity<'_> {
    /// Directory subject id if present, else the username.
    pub fn identifier(&self) -> Result<&str, LifecycleError> {
        self.attributes
            .subject()
            .or_else(|| Some(self.username).filter(|u| !u.is_empty()))
            .ok_or(LifecycleError::MissingIdentifier)
    }
}

pub struct RegisterUnverifiedUserUseCase<S: UnverifiedUserStore> {
    pub store: S,
    pub ttl_minutes: u32,
}

impl<S: UnverifiedUserStore> RegisterUnverifiedUserUseCase<S> {
    /// Registration happens once per identifier; a second attempt is `AlreadyRegistered`.
    pub async fn execute(
        &self,
        input: UserIdentity<'_>,
        now: DateTime<Utc>,
    ) -> Result<UnverifiedUserRecord, LifecycleError> {
        let user_id = input.identifier()?;
        let record = UnverifiedUserRecord::new_unverified(user_id.to_owned(), now, self.ttl_minutes);
        self.store.put_if_absent(&record).await?;
        tracing::info!(user_id = %record.user_id, expires_at = ?record.expires_at, "unverified user registered");
        Ok(record)
    }
}

// ── MarkVerified ─────────────────────────────────────────────────────────────

pub struct MarkVerifiedUseCase<S: UnverifiedUserStore> {
    pub store: S,
}

impl<S: UnverifiedUserStore> MarkVerifiedUseCase<S> {
    /// Safe to repeat: directory triggers may be retried.
    pub async fn execute(
        &self,
        identity: UserIdentity<'_>,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        let user_id = identity.identifier()?;
        self.store.mark_verified(user_id, now.timestamp()).await?;
        tracing::info!(user_id, "user marked verified");
        Ok(())
    }
}

// ── FindStaleUsers ───────────────────────────────────────────────────────────

pub struct FindStaleUsersUseCase<D: DirectoryPort> {
    pub directory: D,
    pub grace_period_hours: u32,
}

impl<D: DirectoryPort> FindStaleUsersUseCase<D> {
    /// One page of unconfirmed users older than the grace period with no
    /// verified contact channel. Callers drive further pages with the cursor.
    pub async fn execute(
        &self,
        cutoff: DateTime<Utc>,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<StaleCandidate>, LifecycleError> {
        let scanner = DirectoryScanner::new(
            &self.directory,
            DirectoryFilter::StatusEquals(UserStatus::Unconfirmed),
        );
        let page = scanner.page(cursor).await?;
        let grace = Duration::hours(i64::from(self.grace_period_hours));
        let items = page
            .items
            .into_iter()
            .filter_map(|user| stale_candidate(user, cutoff, grace))
            .collect();
        Ok(Page {
            items,
            next: page.next,
        })
    }
}

fn stale_candidate(
    user: DirectoryUser,
    cutoff: DateTime<Utc>,
    grace: Duration,
) -> Option<StaleCandidate> {
    if user.status != UserStatus::Unconfirmed {
        return None;
    }
    let username = user.username.filter(|u| !u.is_empty())?;
    let created_at = user.created_at?;
    if cutoff - created_at < grace {
        return None;
    }
    if !user.attributes.has_no_verified_contact() {
        return None;
    }
    Some(StaleCandidate {
        username,
        user_create_date: created_at,
    })
}

// ── ReclaimUser ──────────────────────────────────────────────────────────────

pub struct ReclaimUserUseCase<D: DirectoryPort> {
    pub directory: D,
}

impl<D: DirectoryPort> ReclaimUserUseCase<D> {
    /// Delete the directory entry. The local record is left to its own expiry.
    pub async fn execute(&self, identifier: &str) -> Result<(), LifecycleError> {
        if identifier.is_empty() {
            return Err(LifecycleError::MissingIdentifier);
        }
        self.directory.delete(identifier).await?;
        tracing::info!(username = identifier, "directory user reclaimed");
        Ok(())
    }
}
