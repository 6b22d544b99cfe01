//! Create watchlist_entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WatchlistEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WatchlistEntry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WatchlistEntry::Username)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WatchlistEntry::ContentKind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WatchlistEntry::ContentId).integer().not_null())
                    .col(
                        ColumnDef::new(WatchlistEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watchlist_entry_user")
                            .from(WatchlistEntry::Table, WatchlistEntry::Username)
                            .to(User::Table, User::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (username, content_kind, content_id) - no duplicates
        manager
            .create_index(
                Index::create()
                    .name("idx_watchlist_entry_user_content")
                    .table(WatchlistEntry::Table)
                    .col(WatchlistEntry::Username)
                    .col(WatchlistEntry::ContentKind)
                    .col(WatchlistEntry::ContentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WatchlistEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WatchlistEntry {
    Table,
    Id,
    Username,
    ContentKind,
    ContentId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Username,
}
