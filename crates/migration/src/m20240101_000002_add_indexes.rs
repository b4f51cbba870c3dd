use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every lookup filters on deleted_at IS NULL
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_deleted_at")
                    .table(User::Table)
                    .col(User::DeletedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_created_at")
                    .table(User::Table)
                    .col(User::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_created_at").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_deleted_at").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, CreatedAt, DeletedAt }
