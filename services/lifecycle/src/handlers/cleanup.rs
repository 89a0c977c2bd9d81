use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;

use tollgate_domain::pagination::PaginationCursor;

use crate::error::LifecycleError;
use crate::state::AppState;
use crate::usecase::cleanup::{
    ListStaleCandidatesResult, ListStaleCandidatesUseCase, ReclaimCandidateResult,
    ReclaimCandidateUseCase, SWEEP_BATCH_LIMIT, SweepExpiredRecordsUseCase, SweepExpiredResult,
};

// ── POST /cleanup/list ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListRequest {
    #[serde(default)]
    pub next_token: Option<String>,
}

pub async fn list_stale(
    State(state): State<AppState>,
    body: Option<Json<ListRequest>>,
) -> Result<Json<ListStaleCandidatesResult>, LifecycleError> {
    let Json(body) = body.unwrap_or_default();
    let usecase = ListStaleCandidatesUseCase {
        directory: state.directory(),
        grace_period_hours: state.grace_period_hours,
    };
    let result = usecase
        .execute(PaginationCursor::from_optional(body.next_token), Utc::now())
        .await?;
    Ok(Json(result))
}

// ── POST /cleanup/delete ─────────────────────────────────────────────────────

/// Accepts a list-phase item verbatim; only `username` is read.
#[derive(Deserialize)]
pub struct DeleteRequest {
    pub user: DeleteTarget,
}

#[derive(Deserialize)]
pub struct DeleteTarget {
    pub username: String,
}

pub async fn delete_stale(
    State(state): State<AppState>,
    Json(body): Json<DeleteRequest>,
) -> Result<Json<ReclaimCandidateResult>, LifecycleError> {
    let usecase = ReclaimCandidateUseCase {
        directory: state.directory(),
    };
    let result = usecase.execute(&body.user.username).await?;
    Ok(Json(result))
}

// ── POST /cleanup/sweep-expired ──────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SweepRequest {
    #[serde(default)]
    pub limit: Option<u64>,
}

pub async fn sweep_expired(
    State(state): State<AppState>,
    body: Option<Json<SweepRequest>>,
) -> Result<Json<SweepExpiredResult>, LifecycleError> {
    let Json(body) = body.unwrap_or_default();
    let usecase = SweepExpiredRecordsUseCase {
        directory: state.directory(),
        store: state.store(),
    };
    let limit = body.limit.unwrap_or(SWEEP_BATCH_LIMIT);
    let result = usecase.execute(Utc::now(), limit).await?;
    Ok(Json(result))
}
