//! Create movie table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Movie::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Movie::Name).string_len(512).not_null())
                    .col(ColumnDef::new(Movie::Genre).string_len(64))
                    .col(ColumnDef::new(Movie::Posters).string_len(1024))
                    .col(
                        ColumnDef::new(Movie::Popularity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Movie::Rating).double().not_null().default(0.0))
                    .col(ColumnDef::new(Movie::ReleaseYear).integer())
                    .col(ColumnDef::new(Movie::Description).text())
                    .col(ColumnDef::new(Movie::Director).string_len(256))
                    .to_owned(),
            )
            .await?;

        // Index: genre (for recommendations)
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genre")
                    .table(Movie::Table)
                    .col(Movie::Genre)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Movie {
    Table,
    Id,
    Name,
    Genre,
    Posters,
    Popularity,
    Rating,
    ReleaseYear,
    Description,
    Director,
}
