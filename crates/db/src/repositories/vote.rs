//! Vote repository.
//!
//! A vote row is one user's active upvote. The row and the subject's
//! `upvote_count` always change together inside one transaction, and the
//! count returned is re-read inside that same transaction.

use std::sync::Arc;

use crate::entities::{Comment, CommentVote, Post, PostVote, comment, comment_vote, post, post_vote};
use chrono::Utc;
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// Vote state of one user on one post or comment after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    /// Current upvote count of the subject.
    pub upvote_count: i32,
    /// Whether the user now has an active upvote.
    pub voted: bool,
}

async fn post_upvote_count<C: ConnectionTrait>(conn: &C, post_id: i32) -> AppResult<i32> {
    Post::find_by_id(post_id)
        .select_only()
        .column(post::Column::UpvoteCount)
        .into_tuple::<i32>()
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Post: {post_id}")))
}

async fn comment_upvote_count<C: ConnectionTrait>(conn: &C, comment_id: i32) -> AppResult<i32> {
    Comment::find_by_id(comment_id)
        .select_only()
        .column(comment::Column::UpvoteCount)
        .into_tuple::<i32>()
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Comment: {comment_id}")))
}

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Upvote a post. Upvoting again leaves the count unchanged.
    pub async fn upvote_post(
        &self,
        vote_id: String,
        post_id: i32,
        username: &str,
    ) -> AppResult<VoteTally> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = PostVote::find()
            .filter(post_vote::Column::PostId.eq(post_id))
            .filter(post_vote::Column::Username.eq(username))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_none() {
            let vote = post_vote::ActiveModel {
                id: Set(vote_id),
                post_id: Set(post_id),
                username: Set(username.to_string()),
                created_at: Set(Utc::now().into()),
            };

            let inserted = vote.insert(&txn).await;
            match inserted {
                Ok(_) => {}
                Err(e) if crate::is_unique_violation(&e) => {
                    // A concurrent request recorded the same vote first.
                    txn.rollback()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                    let upvote_count = post_upvote_count(self.db.as_ref(), post_id).await?;
                    return Ok(VoteTally {
                        upvote_count,
                        voted: true,
                    });
                }
                Err(e) => return Err(AppError::Database(e.to_string())),
            }

            Post::update_many()
                .col_expr(
                    post::Column::UpvoteCount,
                    Expr::col(post::Column::UpvoteCount).add(1),
                )
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let upvote_count = post_upvote_count(&txn, post_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(VoteTally {
            upvote_count,
            voted: true,
        })
    }

    /// Remove a user's upvote from a post. Without a vote this is a no-op.
    pub async fn remove_post_upvote(&self, post_id: i32, username: &str) -> AppResult<VoteTally> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = PostVote::delete_many()
            .filter(post_vote::Column::PostId.eq(post_id))
            .filter(post_vote::Column::Username.eq(username))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            Post::update_many()
                .col_expr(
                    post::Column::UpvoteCount,
                    Expr::cust("CASE WHEN upvote_count > 0 THEN upvote_count - 1 ELSE 0 END"),
                )
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let upvote_count = post_upvote_count(&txn, post_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(VoteTally {
            upvote_count,
            voted: false,
        })
    }

    /// Upvote a comment. Upvoting again leaves the count unchanged.
    pub async fn upvote_comment(
        &self,
        vote_id: String,
        comment_id: i32,
        username: &str,
    ) -> AppResult<VoteTally> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = CommentVote::find()
            .filter(comment_vote::Column::CommentId.eq(comment_id))
            .filter(comment_vote::Column::Username.eq(username))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_none() {
            let vote = comment_vote::ActiveModel {
                id: Set(vote_id),
                comment_id: Set(comment_id),
                username: Set(username.to_string()),
                created_at: Set(Utc::now().into()),
            };

            let inserted = vote.insert(&txn).await;
            match inserted {
                Ok(_) => {}
                Err(e) if crate::is_unique_violation(&e) => {
                    txn.rollback()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                    let upvote_count = comment_upvote_count(self.db.as_ref(), comment_id).await?;
                    return Ok(VoteTally {
                        upvote_count,
                        voted: true,
                    });
                }
                Err(e) => return Err(AppError::Database(e.to_string())),
            }

            Comment::update_many()
                .col_expr(
                    comment::Column::UpvoteCount,
                    Expr::col(comment::Column::UpvoteCount).add(1),
                )
                .filter(comment::Column::Id.eq(comment_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let upvote_count = comment_upvote_count(&txn, comment_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(VoteTally {
            upvote_count,
            voted: true,
        })
    }

    /// Remove a user's upvote from a comment. Without a vote this is a no-op.
    pub async fn remove_comment_upvote(
        &self,
        comment_id: i32,
        username: &str,
    ) -> AppResult<VoteTally> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = CommentVote::delete_many()
            .filter(comment_vote::Column::CommentId.eq(comment_id))
            .filter(comment_vote::Column::Username.eq(username))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            Comment::update_many()
                .col_expr(
                    comment::Column::UpvoteCount,
                    Expr::cust("CASE WHEN upvote_count > 0 THEN upvote_count - 1 ELSE 0 END"),
                )
                .filter(comment::Column::Id.eq(comment_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let upvote_count = comment_upvote_count(&txn, comment_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(VoteTally {
            upvote_count,
            voted: false,
        })
    }
}
