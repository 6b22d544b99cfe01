//! Create post and post_tag tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Post::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Post::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Post::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Post::ContentText).text().not_null())
                    .col(
                        ColumnDef::new(Post::DateOfPost)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Post::MovieId).integer())
                    .col(ColumnDef::new(Post::TvShowId).integer())
                    .col(ColumnDef::new(Post::PollId).integer())
                    .col(
                        ColumnDef::new(Post::UpvoteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Post::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_user")
                            .from(Post::Table, Post::Username)
                            .to(User::Table, User::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_movie")
                            .from(Post::Table, Post::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tv_show")
                            .from(Post::Table, Post::TvShowId)
                            .to(TvShow::Table, TvShow::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: username (author filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_username")
                    .table(Post::Table)
                    .col(Post::Username)
                    .to_owned(),
            )
            .await?;

        // Index: date_of_post (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_date_of_post")
                    .table(Post::Table)
                    .col(Post::DateOfPost)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_movie_id")
                    .table(Post::Table)
                    .col(Post::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_tv_show_id")
                    .table(Post::Table)
                    .col(Post::TvShowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostTag::PostId).integer().not_null())
                    .col(ColumnDef::new(PostTag::Tag).string_len(128).not_null())
                    .col(
                        ColumnDef::new(PostTag::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(Index::create().col(PostTag::PostId).col(PostTag::Tag))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tag_post")
                            .from(PostTag::Table, PostTag::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: tag (tag filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_tag_tag")
                    .table(PostTag::Table)
                    .col(PostTag::Tag)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    Username,
    Title,
    ContentText,
    DateOfPost,
    MovieId,
    TvShowId,
    PollId,
    UpvoteCount,
    CommentCount,
}

#[derive(Iden)]
enum PostTag {
    Table,
    PostId,
    Tag,
    Position,
}

#[derive(Iden)]
enum User {
    Table,
    Username,
}

#[derive(Iden)]
enum Movie {
    Table,
    Id,
}

#[derive(Iden)]
enum TvShow {
    Table,
    Id,
}
