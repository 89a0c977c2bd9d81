#![allow(async_fn_in_trait)]

use tollgate_domain::directory::{DirectoryFilter, DirectoryUser};
use tollgate_domain::pagination::{Page, PaginationCursor};

use crate::domain::types::UnverifiedUserRecord;
use crate::error::LifecycleError;

/// Port for the external user directory.
///
/// Transport failures surface as `LifecycleError::Unavailable`.
pub trait DirectoryPort: Send + Sync {
    /// Fetch one page of users matching `filter`. `None` in `next` ends the scan.
    async fn search(
        &self,
        filter: &DirectoryFilter,
        limit: u32,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<DirectoryUser>, LifecycleError>;

    /// Delete a user by username or subject id. Deleting an absent user succeeds.
    async fn delete(&self, identifier: &str) -> Result<(), LifecycleError>;

    /// Delete a user by username or subject id only while its status is
    /// `UNCONFIRMED`. Returns whether a user was deleted.
    async fn delete_unconfirmed(&self, identifier: &str) -> Result<bool, LifecycleError>;
}

/// Store owning the unverified-user lifecycle records.
pub trait UnverifiedUserStore: Send + Sync {
    /// Conditional create: fails with `AlreadyRegistered` if a record with the
    /// same `user_id` exists. Must be a single conditional write, not read-then-write.
    async fn put_if_absent(&self, record: &UnverifiedUserRecord) -> Result<(), LifecycleError>;

    /// Set `verified_at` and remove `expires_at` in one write, creating the
    /// record when absent.
    async fn mark_verified(&self, user_id: &str, verified_at: i64) -> Result<(), LifecycleError>;

    /// Ids of up to `limit` records whose `expires_at <= now`.
    async fn list_expired(&self, now: i64, limit: u64) -> Result<Vec<String>, LifecycleError>;

    /// Delete the given records, skipping any that no longer have `expires_at <= now`
    /// (verified in the meantime). Returns the number removed.
    async fn remove_expired(&self, user_ids: &[String], now: i64) -> Result<u64, LifecycleError>;
}

/// Bot-verification service (reCAPTCHA-style siteverify).
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: &str, secret: &str) -> Result<bool, LifecycleError>;
}

// Borrowed ports, so one use case can hand its adapters to another.

impl<T: DirectoryPort + ?Sized> DirectoryPort for &T {
    async fn search(
        &self,
        filter: &DirectoryFilter,
        limit: u32,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<DirectoryUser>, LifecycleError> {
        (**self).search(filter, limit, cursor).await
    }

    async fn delete(&self, identifier: &str) -> Result<(), LifecycleError> {
        (**self).delete(identifier).await
    }

    async fn delete_unconfirmed(&self, identifier: &str) -> Result<bool, LifecycleError> {
        (**self).delete_unconfirmed(identifier).await
    }
}

impl<T: UnverifiedUserStore + ?Sized> UnverifiedUserStore for &T {
    async fn put_if_absent(&self, record: &UnverifiedUserRecord) -> Result<(), LifecycleError> {
        (**self).put_if_absent(record).await
    }

    async fn mark_verified(&self, user_id: &str, verified_at: i64) -> Result<(), LifecycleError> {
        (**self).mark_verified(user_id, verified_at).await
    }

    async fn list_expired(&self, now: i64, limit: u64) -> Result<Vec<String>, LifecycleError> {
        (**self).list_expired(now, limit).await
    }

    async fn remove_expired(&self, user_ids: &[String], now: i64) -> Result<u64, LifecycleError> {
        (**self).remove_expired(user_ids, now).await
    }
}
