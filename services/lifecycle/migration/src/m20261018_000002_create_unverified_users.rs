use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnverifiedUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnverifiedUsers::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnverifiedUsers::CreatedAt).big_integer())
                    .col(ColumnDef::new(UnverifiedUsers::ExpiresAt).big_integer())
                    .col(ColumnDef::new(UnverifiedUsers::VerifiedAt).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UnverifiedUsers::Table)
                    .col(UnverifiedUsers::ExpiresAt)
                    .name("idx_unverified_users_expires_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnverifiedUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UnverifiedUsers {
    Table,
    UserId,
    CreatedAt,
    ExpiresAt,
    VerifiedAt,
}
