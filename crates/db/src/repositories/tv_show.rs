//! TV show repository.

use std::sync::Arc;

use crate::entities::{TvShow, tv_show};
use rateit_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

/// TV show repository for database operations.
#[derive(Clone)]
pub struct TvShowRepository {
    db: Arc<DatabaseConnection>,
}

impl TvShowRepository {
    /// Create a new TV show repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a TV show by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<tv_show::Model>> {
        TvShow::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a TV show by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<tv_show::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("TV show: {id}")))
    }

    /// List all TV shows, most popular first.
    pub async fn find_all(&self) -> AppResult<Vec<tv_show::Model>> {
        TvShow::find()
            .order_by_desc(tv_show::Column::Popularity)
            .order_by_asc(tv_show::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find TV shows by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<tv_show::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        TvShow::find()
            .filter(tv_show::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top-rated TV shows in any of `genres`, skipping `exclude`.
    pub async fn find_by_genres(
        &self,
        genres: &[String],
        exclude: &[i32],
        limit: u64,
    ) -> AppResult<Vec<tv_show::Model>> {
        if genres.is_empty() {
            return Ok(vec![]);
        }

        let mut query = TvShow::find().filter(tv_show::Column::Genre.is_in(genres.iter().cloned()));
        if !exclude.is_empty() {
            query = query.filter(tv_show::Column::Id.is_not_in(exclude.iter().copied()));
        }

        query
            .order_by_desc(tv_show::Column::Rating)
            .order_by_desc(tv_show::Column::Popularity)
            .order_by_asc(tv_show::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most popular TV shows, skipping `exclude`.
    pub async fn find_most_popular(
        &self,
        exclude: &[i32],
        limit: u64,
    ) -> AppResult<Vec<tv_show::Model>> {
        let mut query = TvShow::find();
        if !exclude.is_empty() {
            query = query.filter(tv_show::Column::Id.is_not_in(exclude.iter().copied()));
        }

        query
            .order_by_desc(tv_show::Column::Popularity)
            .order_by_asc(tv_show::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
