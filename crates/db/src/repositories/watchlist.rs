//! Watchlist repository.

use std::sync::Arc;

use crate::entities::{
    WatchlistEntry,
    watchlist_entry::{self, ContentKind},
};
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Watchlist repository for database operations.
#[derive(Clone)]
pub struct WatchlistRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchlistRepository {
    /// Create a new watchlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert an entry. Returns `false` if the content was already listed.
    pub async fn add(&self, model: watchlist_entry::ActiveModel) -> AppResult<bool> {
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) if crate::is_unique_violation(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Remove an entry. Returns `false` if there was nothing to remove.
    pub async fn remove(
        &self,
        username: &str,
        kind: ContentKind,
        content_id: i32,
    ) -> AppResult<bool> {
        let result = WatchlistEntry::delete_many()
            .filter(watchlist_entry::Column::Username.eq(username))
            .filter(watchlist_entry::Column::ContentKind.eq(kind))
            .filter(watchlist_entry::Column::ContentId.eq(content_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// List a user's entries, newest first.
    pub async fn find_by_user(&self, username: &str) -> AppResult<Vec<watchlist_entry::Model>> {
        WatchlistEntry::find()
            .filter(watchlist_entry::Column::Username.eq(username))
            .order_by_desc(watchlist_entry::Column::CreatedAt)
            .order_by_desc(watchlist_entry::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's entries.
    pub async fn count_by_user(&self, username: &str) -> AppResult<u64> {
        WatchlistEntry::find()
            .filter(watchlist_entry::Column::Username.eq(username))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Content IDs of one kind on a user's watchlist.
    pub async fn content_ids(&self, username: &str, kind: ContentKind) -> AppResult<Vec<i32>> {
        WatchlistEntry::find()
            .select_only()
            .column(watchlist_entry::Column::ContentId)
            .filter(watchlist_entry::Column::Username.eq(username))
            .filter(watchlist_entry::Column::ContentKind.eq(kind))
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
