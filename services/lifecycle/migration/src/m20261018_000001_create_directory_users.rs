use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DirectoryUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DirectoryUsers::PoolId).string().not_null())
                    .col(ColumnDef::new(DirectoryUsers::Username).string().not_null())
                    .col(ColumnDef::new(DirectoryUsers::Status).string().not_null())
                    .col(
                        ColumnDef::new(DirectoryUsers::Attributes)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(DirectoryUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DirectoryUsers::PoolId)
                            .col(DirectoryUsers::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(DirectoryUsers::Table)
                    .col(DirectoryUsers::PoolId)
                    .col(DirectoryUsers::Status)
                    .name("idx_directory_users_pool_id_status")
                    .to_owned(),
            )
            .await?;

        // containment lookups on email, phone_number and sub
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_directory_users_attributes \
                 ON directory_users USING GIN (attributes jsonb_path_ops)",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectoryUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DirectoryUsers {
    Table,
    PoolId,
    Username,
    Status,
    Attributes,
    CreatedAt,
}
