//! Create the `todo` table with FK to `user`.
//!
//! `completed_at` is epoch milliseconds and nullable; it is non-null exactly
//! when `completed` is true.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todo::Table)
                    .if_not_exists()
                    .col(uuid(Todo::Id).primary_key())
                    .col(uuid(Todo::OwnerId).not_null())
                    .col(text(Todo::Text).not_null())
                    .col(boolean(Todo::Completed).not_null().default(false))
                    .col(
                        ColumnDef::new(Todo::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Todo::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Todo::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_owner")
                            .from(Todo::Table, Todo::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Todo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Todo { Table, Id, OwnerId, Text, Completed, CompletedAt, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
