//! Create post_vote and comment_vote tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostVote::PostId).integer().not_null())
                    .col(ColumnDef::new(PostVote::Username).string_len(64).not_null())
                    .col(
                        ColumnDef::new(PostVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_vote_post")
                            .from(PostVote::Table, PostVote::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_vote_user")
                            .from(PostVote::Table, PostVote::Username)
                            .to(User::Table, User::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (post_id, username) - one vote per user per post
        manager
            .create_index(
                Index::create()
                    .name("idx_post_vote_post_username")
                    .table(PostVote::Table)
                    .col(PostVote::PostId)
                    .col(PostVote::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommentVote::CommentId).integer().not_null())
                    .col(
                        ColumnDef::new(CommentVote::Username)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommentVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_vote_comment")
                            .from(CommentVote::Table, CommentVote::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_vote_user")
                            .from(CommentVote::Table, CommentVote::Username)
                            .to(User::Table, User::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (comment_id, username) - one vote per user per comment
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_vote_comment_username")
                    .table(CommentVote::Table)
                    .col(CommentVote::CommentId)
                    .col(CommentVote::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentVote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostVote {
    Table,
    Id,
    PostId,
    Username,
    CreatedAt,
}

#[derive(Iden)]
enum CommentVote {
    Table,
    Id,
    CommentId,
    Username,
    CreatedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Username,
}
