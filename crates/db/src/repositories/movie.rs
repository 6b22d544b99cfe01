//! Movie repository.

use std::sync::Arc;

use crate::entities::{Movie, movie};
use rateit_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

/// Movie repository for database operations.
#[derive(Clone)]
pub struct MovieRepository {
    db: Arc<DatabaseConnection>,
}

impl MovieRepository {
    /// Create a new movie repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a movie by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Movie::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a movie by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<movie::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie: {id}")))
    }

    /// List all movies, most popular first.
    pub async fn find_all(&self) -> AppResult<Vec<movie::Model>> {
        Movie::find()
            .order_by_desc(movie::Column::Popularity)
            .order_by_asc(movie::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find movies by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<movie::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Movie::find()
            .filter(movie::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top-rated movies in any of `genres`, skipping `exclude`.
    pub async fn find_by_genres(
        &self,
        genres: &[String],
        exclude: &[i32],
        limit: u64,
    ) -> AppResult<Vec<movie::Model>> {
        if genres.is_empty() {
            return Ok(vec![]);
        }

        let mut query = Movie::find().filter(movie::Column::Genre.is_in(genres.iter().cloned()));
        if !exclude.is_empty() {
            query = query.filter(movie::Column::Id.is_not_in(exclude.iter().copied()));
        }

        query
            .order_by_desc(movie::Column::Rating)
            .order_by_desc(movie::Column::Popularity)
            .order_by_asc(movie::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most popular movies, skipping `exclude`.
    pub async fn find_most_popular(
        &self,
        exclude: &[i32],
        limit: u64,
    ) -> AppResult<Vec<movie::Model>> {
        let mut query = Movie::find();
        if !exclude.is_empty() {
            query = query.filter(movie::Column::Id.is_not_in(exclude.iter().copied()));
        }

        query
            .order_by_desc(movie::Column::Popularity)
            .order_by_asc(movie::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{TestDatabase, seed_movie};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_movie(id: i32, name: &str, genre: &str) -> movie::Model {
        movie::Model {
            id,
            name: name.to_string(),
            genre: Some(genre.to_string()),
            posters: None,
            popularity: 10.0,
            rating: 7.5,
            release_year: Some(2010),
            description: None,
            director: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let movie = create_test_movie(5, "Heat", "Crime");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[movie.clone()]])
                .into_connection(),
        );

        let repo = MovieRepository::new(db);
        let result = repo.find_by_id(5).await.unwrap();

        assert_eq!(result.unwrap().name, "Heat");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<movie::Model>::new()])
                .into_connection(),
        );

        let repo = MovieRepository::new(db);
        let result = repo.get_by_id(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_orders_by_popularity() {
        let db = TestDatabase::new().await.unwrap();
        seed_movie(&db.conn, 1, "Quiet", Some("Drama"), 6.0, 1.0)
            .await
            .unwrap();
        seed_movie(&db.conn, 2, "Loud", Some("Action"), 6.0, 50.0)
            .await
            .unwrap();

        let repo = MovieRepository::new(db.connection());
        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();

        assert_eq!(names, vec!["Loud", "Quiet"]);
    }

    #[tokio::test]
    async fn test_find_by_genres_excludes_and_ranks() {
        let db = TestDatabase::new().await.unwrap();
        seed_movie(&db.conn, 1, "Seen", Some("Drama"), 9.0, 5.0)
            .await
            .unwrap();
        seed_movie(&db.conn, 2, "Good", Some("Drama"), 8.0, 5.0)
            .await
            .unwrap();
        seed_movie(&db.conn, 3, "Better", Some("Drama"), 8.5, 5.0)
            .await
            .unwrap();
        seed_movie(&db.conn, 4, "Other", Some("Comedy"), 9.9, 5.0)
            .await
            .unwrap();

        let repo = MovieRepository::new(db.connection());
        let ids: Vec<_> = repo
            .find_by_genres(&["Drama".to_string()], &[1], 10)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec![3, 2]);
    }
}
