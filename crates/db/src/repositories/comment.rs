//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, Post, comment, post};
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};

/// Ordering of a post's comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentOrder {
    /// Newest first.
    #[default]
    Recent,
    /// Oldest first.
    Oldest,
    /// Most upvoted first, newest among ties.
    Top,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment: {id}")))
    }

    /// Insert a comment and bump the post's comment count.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let comment = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Post::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::col(post::Column::CommentCount).add(1),
            )
            .filter(post::Column::Id.eq(comment.post_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(comment)
    }

    /// Delete a comment and decrement the post's comment count.
    pub async fn delete(&self, comment: &comment::Model) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Comment::delete_by_id(comment.id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Comment: {}", comment.id)));
        }

        Post::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::cust("CASE WHEN comment_count > 0 THEN comment_count - 1 ELSE 0 END"),
            )
            .filter(post::Column::Id.eq(comment.post_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a post's comments.
    pub async fn find_by_post(
        &self,
        post_id: i32,
        order: CommentOrder,
    ) -> AppResult<Vec<comment::Model>> {
        let query = Comment::find().filter(comment::Column::PostId.eq(post_id));

        let query = match order {
            CommentOrder::Recent => query
                .order_by_desc(comment::Column::DateOfComment)
                .order_by_desc(comment::Column::Id),
            CommentOrder::Oldest => query
                .order_by_asc(comment::Column::DateOfComment)
                .order_by_asc(comment::Column::Id),
            CommentOrder::Top => query
                .order_by_desc(comment::Column::UpvoteCount)
                .order_by_desc(comment::Column::DateOfComment)
                .order_by_desc(comment::Column::Id),
        };

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
