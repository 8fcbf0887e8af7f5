use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Todos: every read path filters by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_todo_owner")
                    .table(Todo::Table)
                    .col(Todo::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Tokens: the gate looks up by (user_id, purpose, token)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_token_user")
                    .table(UserToken::Table)
                    .col(UserToken::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_todo_owner").table(Todo::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_token_user")
                    .table(UserToken::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Todo { Table, OwnerId }

#[derive(DeriveIden)]
enum UserToken { Table, UserId }
