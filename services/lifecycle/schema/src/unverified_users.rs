use sea_orm::entity::prelude::*;

/// Lifecycle record of a signed-up account. Timestamps are epoch seconds.
///
/// `expires_at` is present until the account is verified.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "unverified_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub created_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub verified_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
