//! Create tv_show table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TvShow::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TvShow::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(TvShow::Name).string_len(512).not_null())
                    .col(ColumnDef::new(TvShow::Genre).string_len(64))
                    .col(ColumnDef::new(TvShow::Posters).string_len(1024))
                    .col(
                        ColumnDef::new(TvShow::Popularity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(TvShow::Rating).double().not_null().default(0.0))
                    .col(ColumnDef::new(TvShow::ReleaseYear).integer())
                    .col(ColumnDef::new(TvShow::Seasons).integer())
                    .col(ColumnDef::new(TvShow::Episodes).integer())
                    .col(ColumnDef::new(TvShow::Description).text())
                    .col(ColumnDef::new(TvShow::Director).string_len(256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tv_show_genre")
                    .table(TvShow::Table)
                    .col(TvShow::Genre)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TvShow::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TvShow {
    Table,
    Id,
    Name,
    Genre,
    Posters,
    Popularity,
    Rating,
    ReleaseYear,
    Seasons,
    Episodes,
    Description,
    Director,
}
