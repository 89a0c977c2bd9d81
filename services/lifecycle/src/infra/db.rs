use anyhow::Context as _;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Expr, OnConflict},
};

use tollgate_domain::directory::{DirectoryFilter, DirectoryUser, UserAttributes, UserStatus};
use tollgate_domain::pagination::{Page, PaginationCursor};
use tollgate_lifecycle_schema::{directory_users, unverified_users};

use crate::domain::repository::{DirectoryPort, UnverifiedUserStore};
use crate::domain::types::UnverifiedUserRecord;
use crate::error::LifecycleError;

// ── Unverified user store ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUnverifiedUserStore {
    pub db: DatabaseConnection,
}

impl UnverifiedUserStore for DbUnverifiedUserStore {
    async fn put_if_absent(&self, record: &UnverifiedUserRecord) -> Result<(), LifecycleError> {
        let inserted = unverified_users::Entity::insert(unverified_users::ActiveModel {
            user_id: Set(record.user_id.clone()),
            created_at: Set(record.created_at),
            expires_at: Set(record.expires_at),
            verified_at: Set(record.verified_at),
        })
        .on_conflict(
            OnConflict::column(unverified_users::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert unverified user")?;
        if inserted == 0 {
            return Err(LifecycleError::AlreadyRegistered);
        }
        Ok(())
    }

    async fn mark_verified(&self, user_id: &str, verified_at: i64) -> Result<(), LifecycleError> {
        unverified_users::Entity::insert(unverified_users::ActiveModel {
            user_id: Set(user_id.to_owned()),
            created_at: Set(None),
            expires_at: Set(None),
            verified_at: Set(Some(verified_at)),
        })
        .on_conflict(
            OnConflict::column(unverified_users::Column::UserId)
                .update_columns([
                    unverified_users::Column::VerifiedAt,
                    unverified_users::Column::ExpiresAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    async fn list_expired(&self, now: i64, limit: u64) -> Result<Vec<String>, LifecycleError> {
        let ids = unverified_users::Entity::find()
            .select_only()
            .column(unverified_users::Column::UserId)
            .filter(unverified_users::Column::ExpiresAt.lte(now))
            .order_by_asc(unverified_users::Column::ExpiresAt)
            .limit(limit)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list expired unverified users")?;
        Ok(ids)
    }

    async fn remove_expired(&self, user_ids: &[String], now: i64) -> Result<u64, LifecycleError> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = unverified_users::Entity::delete_many()
            .filter(unverified_users::Column::UserId.is_in(user_ids.iter().cloned()))
            .filter(unverified_users::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("remove expired unverified users")?;
        Ok(result.rows_affected)
    }
}

// ── Directory ────────────────────────────────────────────────────────────────

/// Directory accounts of one user pool. Pages are keyset-ordered by username;
/// the cursor is the last username of the previous page.
#[derive(Clone)]
pub struct DbDirectory {
    pub db: DatabaseConnection,
    pub pool_id: String,
}

impl DirectoryPort for DbDirectory {
    async fn search(
        &self,
        filter: &DirectoryFilter,
        limit: u32,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<DirectoryUser>, LifecycleError> {
        let mut query = directory_users::Entity::find()
            .filter(directory_users::Column::PoolId.eq(self.pool_id.as_str()));
        query = match filter {
            DirectoryFilter::AttributeEquals { attribute, value } => query.filter(
                Expr::cust_with_values(
                    "attributes @> jsonb_build_object($1::text, $2::text)",
                    [attribute.name(), value.as_str()],
                ),
            ),
            DirectoryFilter::StatusEquals(status) => {
                query.filter(directory_users::Column::Status.eq(status.as_str()))
            }
        };
        if let Some(after) = cursor {
            query = query.filter(directory_users::Column::Username.gt(after.as_str()));
        }

        // one extra row tells us whether another page exists
        let page_size = limit as usize;
        let mut models = query
            .order_by_asc(directory_users::Column::Username)
            .limit(u64::from(limit) + 1)
            .all(&self.db)
            .await
            .with_context(|| format!("search directory: {filter}"))?;
        let next = if models.len() > page_size {
            models.truncate(page_size);
            models
                .last()
                .map(|m| PaginationCursor::new(m.username.clone()))
        } else {
            None
        };
        Ok(Page {
            items: models.into_iter().map(directory_user_from_model).collect(),
            next,
        })
    }

    async fn delete(&self, identifier: &str) -> Result<(), LifecycleError> {
        let result = directory_users::Entity::delete_many()
            .filter(self.identified_by(identifier))
            .exec(&self.db)
            .await
            .context("delete directory user")?;
        if result.rows_affected == 0 {
            tracing::debug!(identifier, "directory user already absent");
        }
        Ok(())
    }

    async fn delete_unconfirmed(&self, identifier: &str) -> Result<bool, LifecycleError> {
        let result = directory_users::Entity::delete_many()
            .filter(self.identified_by(identifier))
            .filter(directory_users::Column::Status.eq(UserStatus::Unconfirmed.as_str()))
            .exec(&self.db)
            .await
            .context("delete unconfirmed directory user")?;
        Ok(result.rows_affected > 0)
    }
}

impl DbDirectory {
    /// Pool member whose username or `sub` attribute equals `identifier`.
    fn identified_by(&self, identifier: &str) -> Condition {
        Condition::all()
            .add(directory_users::Column::PoolId.eq(self.pool_id.as_str()))
            .add(
                Condition::any()
                    .add(directory_users::Column::Username.eq(identifier))
                    .add(Expr::cust_with_values(
                        "attributes @> jsonb_build_object('sub', $1::text)",
                        [identifier],
                    )),
            )
    }
}

fn directory_user_from_model(model: directory_users::Model) -> DirectoryUser {
    DirectoryUser {
        username: Some(model.username),
        status: model.status.parse().unwrap_or(UserStatus::Unknown),
        created_at: Some(model.created_at),
        attributes: attributes_from_json(model.attributes),
    }
}

/// Attribute values are stored as strings; anything else is kept in its JSON form.
fn attributes_from_json(value: serde_json::Value) -> UserAttributes {
    let serde_json::Value::Object(map) = value else {
        return UserAttributes::new();
    };
    map.into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(s) => Some((name, s)),
            serde_json::Value::Null => None,
            other => Some((name, other.to_string())),
        })
        .collect()
}
