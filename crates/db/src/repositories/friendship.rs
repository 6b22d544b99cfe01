//! Friendship repository.

use std::sync::Arc;

use crate::entities::{Friendship, friendship};
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
    sea_query::{Alias, Expr, Query},
};

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert an edge. Returns `false` if it already existed.
    pub async fn create(&self, model: friendship::ActiveModel) -> AppResult<bool> {
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) if crate::is_unique_violation(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Delete the edge `username -> friend_username`.
    /// Returns `false` if there was no such edge.
    pub async fn delete_by_pair(&self, username: &str, friend_username: &str) -> AppResult<bool> {
        let result = Friendship::delete_many()
            .filter(friendship::Column::Username.eq(username))
            .filter(friendship::Column::FriendUsername.eq(friend_username))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Usernames the user has added, alphabetically.
    pub async fn find_friend_usernames(&self, username: &str) -> AppResult<Vec<String>> {
        Friendship::find()
            .select_only()
            .column(friendship::Column::FriendUsername)
            .filter(friendship::Column::Username.eq(username))
            .order_by_asc(friendship::Column::FriendUsername)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Usernames connected to the user by edges in both directions.
    pub async fn find_mutual_usernames(&self, username: &str) -> AppResult<Vec<String>> {
        let incoming = Alias::new("incoming");

        Friendship::find()
            .select_only()
            .column(friendship::Column::FriendUsername)
            .filter(friendship::Column::Username.eq(username))
            .filter(
                friendship::Column::FriendUsername.in_subquery(
                    Query::select()
                        .column((incoming.clone(), friendship::Column::Username))
                        .from_as(Friendship, incoming.clone())
                        .and_where(
                            Expr::col((incoming, friendship::Column::FriendUsername)).eq(username),
                        )
                        .to_owned(),
                ),
            )
            .order_by_asc(friendship::Column::FriendUsername)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
