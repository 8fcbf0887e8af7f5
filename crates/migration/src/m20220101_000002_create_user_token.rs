//! Create the `user_token` table with FK to `user`.
//!
//! One row per active session token; `created_at` preserves append order.
//! Logout deletes the exact matching row, so revocation is pure row removal.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserToken::Table)
                    .if_not_exists()
                    .col(uuid(UserToken::Id).primary_key())
                    .col(uuid(UserToken::UserId).not_null())
                    .col(string_len(UserToken::Purpose, 32).not_null())
                    .col(text(UserToken::Token).not_null())
                    .col(timestamp_with_time_zone(UserToken::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_token_user")
                            .from(UserToken::Table, UserToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserToken::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserToken { Table, Id, UserId, Purpose, Token, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
