//! Comment service.

use chrono::Utc;
use rateit_common::{AppError, AppResult};
use rateit_db::{
    entities::comment,
    repositories::{CommentOrder, CommentRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Longest accepted comment, in characters, after trimming.
const MAX_COMMENT_LEN: usize = 2000;

/// Input for commenting on a post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    pub comment_text: String,
}

/// Parse the `sortBy` parameter. Absent or blank means most recent first.
pub fn parse_comment_order(sort_by: Option<&str>) -> AppResult<CommentOrder> {
    match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(CommentOrder::Recent),
        Some(s) if s.eq_ignore_ascii_case("recent") => Ok(CommentOrder::Recent),
        Some(s) if s.eq_ignore_ascii_case("oldest") => Ok(CommentOrder::Oldest),
        Some(s) if s.eq_ignore_ascii_case("top") => Ok(CommentOrder::Top),
        Some(other) => Err(AppError::Validation(format!(
            "Unknown sortBy '{other}', expected recent, oldest or top"
        ))),
    }
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
        }
    }

    /// Comment on a post.
    pub async fn create(
        &self,
        post_id: i32,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let text = input.comment_text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment cannot be blank".to_string()));
        }
        if text.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(format!(
                "Comments are limited to {MAX_COMMENT_LEN} characters"
            )));
        }

        self.post_repo.get_by_id(post_id).await?;
        self.user_repo.get_by_username(&input.username).await?;

        let model = comment::ActiveModel {
            post_id: Set(post_id),
            username: Set(input.username.clone()),
            comment_text: Set(text.to_string()),
            date_of_comment: Set(Utc::now().into()),
            upvote_count: Set(0),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        info!(comment_id = comment.id, post_id, "Created comment");
        Ok(comment)
    }

    /// List a post's comments in the requested order.
    pub async fn list(
        &self,
        post_id: i32,
        sort_by: Option<&str>,
    ) -> AppResult<Vec<comment::Model>> {
        let order = parse_comment_order(sort_by)?;
        self.post_repo.get_by_id(post_id).await?;
        self.comment_repo.find_by_post(post_id, order).await
    }

    /// Delete a comment. Only its author may do so.
    pub async fn delete(&self, comment_id: i32, username: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        if comment.username != username {
            return Err(AppError::Forbidden(
                "Only the author can delete this comment".to_string(),
            ));
        }

        self.comment_repo.delete(&comment).await?;
        info!(comment_id, "Deleted comment");
        Ok(())
    }
}
