//! Friend service.
//!
//! Friendship is directed: adding a friend creates one edge. A mutual
//! friend is someone with edges in both directions.

use chrono::Utc;
use rateit_common::{AppError, AppResult, IdGenerator};
use rateit_db::{
    entities::{friendship, user},
    repositories::{FriendshipRepository, UserRepository},
};
use sea_orm::Set;
use tracing::debug;

/// Friend service for business logic.
#[derive(Clone)]
pub struct FriendService {
    friendship_repo: FriendshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FriendService {
    /// Create a new friend service.
    #[must_use]
    pub fn new(friendship_repo: FriendshipRepository, user_repo: UserRepository) -> Self {
        Self {
            friendship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add `friend_username` to the friends of `username`.
    ///
    /// Returns `false` if the edge already existed.
    pub async fn add_friend(&self, username: &str, friend_username: &str) -> AppResult<bool> {
        if username == friend_username {
            return Err(AppError::Validation(
                "Cannot add yourself as a friend".to_string(),
            ));
        }

        self.user_repo.get_by_username(username).await?;
        self.user_repo.get_by_username(friend_username).await?;

        let model = friendship::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            friend_username: Set(friend_username.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let created = self.friendship_repo.create(model).await?;
        debug!(username, friend_username, created, "Added friend");
        Ok(created)
    }

    /// Remove `friend_username` from the friends of `username`.
    pub async fn remove_friend(&self, username: &str, friend_username: &str) -> AppResult<()> {
        if !self
            .friendship_repo
            .delete_by_pair(username, friend_username)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Friendship: {username} -> {friend_username}"
            )));
        }
        Ok(())
    }

    /// Users that `username` has added.
    pub async fn list_friends(&self, username: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_username(username).await?;
        let usernames = self.friendship_repo.find_friend_usernames(username).await?;
        self.user_repo.find_by_usernames(&usernames).await
    }

    /// Users connected to `username` in both directions.
    pub async fn list_mutual_friends(&self, username: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_username(username).await?;
        let usernames = self.friendship_repo.find_mutual_usernames(username).await?;
        self.user_repo.find_by_usernames(&usernames).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rateit_db::test_utils::{TestDatabase, seed_user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> FriendService {
        FriendService::new(
            FriendshipRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_add_yourself_returns_error() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db).add_friend("alice", "alice").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_unknown_friend_not_found() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();

        let result = service(db.connection()).add_friend("alice", "ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_friend_lifecycle() {
        let db = TestDatabase::new().await.unwrap();
        for name in ["alice", "bob", "carol"] {
            seed_user(&db.conn, name).await.unwrap();
        }
        let friends = service(db.connection());

        assert!(friends.add_friend("alice", "bob").await.unwrap());
        assert!(!friends.add_friend("alice", "bob").await.unwrap());
        friends.add_friend("alice", "carol").await.unwrap();
        friends.add_friend("bob", "alice").await.unwrap();

        let names = |users: Vec<user::Model>| {
            users.into_iter().map(|u| u.username).collect::<Vec<_>>()
        };
        assert_eq!(names(friends.list_friends("alice").await.unwrap()), ["bob", "carol"]);
        assert_eq!(names(friends.list_mutual_friends("alice").await.unwrap()), ["bob"]);
        assert!(friends.list_friends("carol").await.unwrap().is_empty());

        friends.remove_friend("alice", "carol").await.unwrap();
        assert_eq!(names(friends.list_friends("alice").await.unwrap()), ["bob"]);

        let again = friends.remove_friend("alice", "carol").await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_friends_unknown_user() {
        let db = TestDatabase::new().await.unwrap();

        let result = service(db.connection()).list_friends("ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
