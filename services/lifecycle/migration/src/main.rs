use sea_orm_migration::prelude::*;

use tollgate_lifecycle_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
