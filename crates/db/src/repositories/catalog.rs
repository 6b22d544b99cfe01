//! Catalog import repository.

use std::sync::Arc;

use crate::entities::{Movie, TvShow, movie, tv_show};
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait, sea_query::OnConflict,
};

/// Rows per upsert statement.
const UPSERT_CHUNK: usize = 500;

/// Bulk writes to the movie and TV show tables.
#[derive(Clone)]
pub struct CatalogRepository {
    db: Arc<DatabaseConnection>,
}

async fn upsert_movies<C: ConnectionTrait>(
    conn: &C,
    models: Vec<movie::ActiveModel>,
) -> AppResult<()> {
    let mut rows = models.into_iter().peekable();

    while rows.peek().is_some() {
        let chunk: Vec<_> = rows.by_ref().take(UPSERT_CHUNK).collect();
        Movie::insert_many(chunk)
            .on_conflict(
                OnConflict::column(movie::Column::Id)
                    .update_columns([
                        movie::Column::Name,
                        movie::Column::Genre,
                        movie::Column::Posters,
                        movie::Column::Popularity,
                        movie::Column::Rating,
                        movie::Column::ReleaseYear,
                        movie::Column::Description,
                        movie::Column::Director,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(())
}

async fn upsert_tv_shows<C: ConnectionTrait>(
    conn: &C,
    models: Vec<tv_show::ActiveModel>,
) -> AppResult<()> {
    let mut rows = models.into_iter().peekable();

    while rows.peek().is_some() {
        let chunk: Vec<_> = rows.by_ref().take(UPSERT_CHUNK).collect();
        TvShow::insert_many(chunk)
            .on_conflict(
                OnConflict::column(tv_show::Column::Id)
                    .update_columns([
                        tv_show::Column::Name,
                        tv_show::Column::Genre,
                        tv_show::Column::Posters,
                        tv_show::Column::Popularity,
                        tv_show::Column::Rating,
                        tv_show::Column::ReleaseYear,
                        tv_show::Column::Seasons,
                        tv_show::Column::Episodes,
                        tv_show::Column::Description,
                        tv_show::Column::Director,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(())
}

impl CatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert or update movies and TV shows by ID in one transaction.
    ///
    /// IDs must be unique within each list; Postgres rejects a statement
    /// that touches the same conflict key twice. Returns the number of
    /// movie and TV show rows written.
    pub async fn upsert(
        &self,
        movies: Vec<movie::ActiveModel>,
        tv_shows: Vec<tv_show::ActiveModel>,
    ) -> AppResult<(usize, usize)> {
        let written = (movies.len(), tv_shows.len());
        if written == (0, 0) {
            return Ok(written);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        upsert_movies(&txn, movies).await?;
        upsert_tv_shows(&txn, tv_shows).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(written)
    }
}
