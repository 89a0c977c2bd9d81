use sea_orm::entity::prelude::*;

/// Directory account within a user pool.
///
/// `attributes` is a flat JSON object of string values (`email`, `email_verified`, `sub`, ...).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "directory_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pool_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
