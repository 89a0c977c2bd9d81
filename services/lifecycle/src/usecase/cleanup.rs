use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tollgate_domain::pagination::PaginationCursor;

use crate::domain::repository::{DirectoryPort, UnverifiedUserStore};
use crate::domain::types::StaleCandidate;
use crate::error::LifecycleError;
use crate::usecase::registry::{FindStaleUsersUseCase, ReclaimUserUseCase};

// ── List phase ───────────────────────────────────────────────────────────────

/// One page of reclaimable accounts, shaped for a fan-out orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStaleCandidatesResult {
    pub users: Vec<StaleCandidate>,
    pub next_token: Option<PaginationCursor>,
}

pub struct ListStaleCandidatesUseCase<D: DirectoryPort> {
    pub directory: D,
    pub grace_period_hours: u32,
}

impl<D: DirectoryPort> ListStaleCandidatesUseCase<D> {
    /// Exactly one directory page per call; the cursor is returned verbatim.
    pub async fn execute(
        &self,
        cursor: Option<PaginationCursor>,
        cutoff: DateTime<Utc>,
    ) -> Result<ListStaleCandidatesResult, LifecycleError> {
        let page = FindStaleUsersUseCase {
            directory: &self.directory,
            grace_period_hours: self.grace_period_hours,
        }
        .execute(cutoff, cursor.as_ref())
        .await?;
        tracing::info!(
            candidates = page.items.len(),
            has_next = page.next.is_some(),
            "listed stale candidates"
        );
        Ok(ListStaleCandidatesResult {
            users: page.items,
            next_token: page.next,
        })
    }
}

// ── Delete phase ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReclaimCandidateResult {
    pub deleted: bool,
    pub username: String,
}

pub struct ReclaimCandidateUseCase<D: DirectoryPort> {
    pub directory: D,
}

impl<D: DirectoryPort> ReclaimCandidateUseCase<D> {
    /// An entry that is already gone still reports `deleted: true`.
    pub async fn execute(&self, username: &str) -> Result<ReclaimCandidateResult, LifecycleError> {
        ReclaimUserUseCase {
            directory: &self.directory,
        }
        .execute(username)
        .await?;
        Ok(ReclaimCandidateResult {
            deleted: true,
            username: username.to_owned(),
        })
    }
}

// ── Expired-record sweep ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepExpiredResult {
    /// Directory entries deleted by this sweep.
    pub reclaimed: Vec<String>,
    /// Expired records with no unconfirmed directory entry behind them:
    /// confirmed since, or already gone.
    pub skipped: Vec<String>,
}

/// Default batch size for one sweep call.
pub const SWEEP_BATCH_LIMIT: u64 = 100;

/// Reclaims the directory entries behind expired lifecycle records, then drops the records.
///
/// Verified records carry no `expires_at` and are never swept. A directory
/// entry is only deleted while still `UNCONFIRMED`. Records are removed after
/// the directory step, so a failed sweep is simply repeated.
pub struct SweepExpiredRecordsUseCase<D: DirectoryPort, S: UnverifiedUserStore> {
    pub directory: D,
    pub store: S,
}

impl<D: DirectoryPort, S: UnverifiedUserStore> SweepExpiredRecordsUseCase<D, S> {
    pub async fn execute(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<SweepExpiredResult, LifecycleError> {
        let expired = self.store.list_expired(now.timestamp(), limit).await?;
        let mut result = SweepExpiredResult {
            reclaimed: vec![],
            skipped: vec![],
        };
        if expired.is_empty() {
            return Ok(result);
        }
        for user_id in &expired {
            if self.directory.delete_unconfirmed(user_id).await? {
                result.reclaimed.push(user_id.clone());
            } else {
                tracing::debug!(user_id, "no unconfirmed directory user behind expired record");
                result.skipped.push(user_id.clone());
            }
        }
        let removed = self.store.remove_expired(&expired, now.timestamp()).await?;
        tracing::info!(
            reclaimed = result.reclaimed.len(),
            skipped = result.skipped.len(),
            removed,
            "expired records swept"
        );
        Ok(result)
    }
}
