//! Vote service.

use rateit_common::{AppResult, IdGenerator};
use rateit_db::repositories::{
    CommentRepository, PostRepository, UserRepository, VoteRepository, VoteTally,
};
use tracing::debug;

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub fn new(
        vote_repo: VoteRepository,
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            vote_repo,
            post_repo,
            comment_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upvote a post. Upvoting twice counts once.
    pub async fn upvote_post(&self, post_id: i32, username: &str) -> AppResult<VoteTally> {
        self.post_repo.get_by_id(post_id).await?;
        self.user_repo.get_by_username(username).await?;

        let tally = self
            .vote_repo
            .upvote_post(self.id_gen.generate(), post_id, username)
            .await?;
        debug!(post_id, username, count = tally.upvote_count, "Upvoted post");
        Ok(tally)
    }

    /// Withdraw an upvote from a post. Withdrawing a missing vote is a no-op.
    pub async fn remove_post_upvote(&self, post_id: i32, username: &str) -> AppResult<VoteTally> {
        self.post_repo.get_by_id(post_id).await?;
        self.user_repo.get_by_username(username).await?;

        let tally = self.vote_repo.remove_post_upvote(post_id, username).await?;
        debug!(post_id, username, count = tally.upvote_count, "Removed post upvote");
        Ok(tally)
    }

    /// Upvote a comment.
    pub async fn upvote_comment(&self, comment_id: i32, username: &str) -> AppResult<VoteTally> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.user_repo.get_by_username(username).await?;

        let tally = self
            .vote_repo
            .upvote_comment(self.id_gen.generate(), comment_id, username)
            .await?;
        debug!(comment_id, username, count = tally.upvote_count, "Upvoted comment");
        Ok(tally)
    }

    /// Withdraw an upvote from a comment.
    pub async fn remove_comment_upvote(
        &self,
        comment_id: i32,
        username: &str,
    ) -> AppResult<VoteTally> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.user_repo.get_by_username(username).await?;

        let tally = self
            .vote_repo
            .remove_comment_upvote(comment_id, username)
            .await?;
        debug!(comment_id, username, count = tally.upvote_count, "Removed comment upvote");
        Ok(tally)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::comment::{CommentService, CreateCommentInput};
    use crate::services::post::{CreatePostInput, PostService};
    use rateit_common::AppError;
    use rateit_db::repositories::{MovieRepository, TvShowRepository};
    use rateit_db::test_utils::{TestDatabase, seed_user};
    use std::sync::Arc;

    fn service(db: &TestDatabase) -> VoteService {
        let conn = db.connection();
        VoteService::new(
            VoteRepository::new(Arc::clone(&conn)),
            PostRepository::new(Arc::clone(&conn)),
            CommentRepository::new(Arc::clone(&conn)),
            UserRepository::new(conn),
        )
    }

    async fn seed_post(db: &TestDatabase, username: &str) -> i32 {
        let conn = db.connection();
        PostService::new(
            PostRepository::new(Arc::clone(&conn)),
            UserRepository::new(Arc::clone(&conn)),
            MovieRepository::new(Arc::clone(&conn)),
            TvShowRepository::new(conn),
        )
        .create(CreatePostInput {
            username: username.to_string(),
            title: "Title".to_string(),
            content_text: "Body".to_string(),
            movie_id: None,
            tv_show_id: None,
            tags: None,
            poll_id: None,
        })
        .await
        .unwrap()
        .post
        .id
    }

    #[tokio::test]
    async fn test_post_upvote_count_stays_zero_or_one() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        let post_id = seed_post(&db, "alice").await;
        let votes = service(&db);

        for _ in 0..3 {
            let tally = votes.upvote_post(post_id, "alice").await.unwrap();
            assert_eq!(tally.upvote_count, 1);
            assert!(tally.voted);
        }

        for _ in 0..2 {
            let tally = votes.remove_post_upvote(post_id, "alice").await.unwrap();
            assert_eq!(tally.upvote_count, 0);
            assert!(!tally.voted);
        }

        let tally = votes.upvote_post(post_id, "alice").await.unwrap();
        assert_eq!(tally.upvote_count, 1);
    }

    #[tokio::test]
    async fn test_votes_from_different_users_add_up() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_user(&db.conn, "bob").await.unwrap();
        let post_id = seed_post(&db, "alice").await;
        let votes = service(&db);

        votes.upvote_post(post_id, "alice").await.unwrap();
        let tally = votes.upvote_post(post_id, "bob").await.unwrap();

        assert_eq!(tally.upvote_count, 2);
    }

    #[tokio::test]
    async fn test_comment_votes() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        let post_id = seed_post(&db, "alice").await;
        let conn = db.connection();
        let comment = CommentService::new(
            CommentRepository::new(Arc::clone(&conn)),
            PostRepository::new(Arc::clone(&conn)),
            UserRepository::new(conn),
        )
        .create(
            post_id,
            CreateCommentInput {
                username: "alice".to_string(),
                comment_text: "nice".to_string(),
            },
        )
        .await
        .unwrap();
        let votes = service(&db);

        votes.upvote_comment(comment.id, "alice").await.unwrap();
        let tally = votes.upvote_comment(comment.id, "alice").await.unwrap();
        assert_eq!(tally.upvote_count, 1);

        let tally = votes
            .remove_comment_upvote(comment.id, "alice")
            .await
            .unwrap();
        assert_eq!(tally.upvote_count, 0);
        assert!(!tally.voted);
    }

    #[tokio::test]
    async fn test_vote_on_missing_subject_or_user() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        let post_id = seed_post(&db, "alice").await;
        let votes = service(&db);

        assert!(matches!(
            votes.upvote_post(999, "alice").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            votes.upvote_post(post_id, "ghost").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            votes.upvote_comment(999, "alice").await,
            Err(AppError::NotFound(_))
        ));
    }
}
