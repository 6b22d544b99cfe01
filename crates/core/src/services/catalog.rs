//! Catalog service.

use std::{collections::BTreeMap, path::Path};

use rateit_common::{AppError, AppResult, Config};
use rateit_db::{
    entities::{movie, tv_show},
    repositories::{CatalogRepository, MovieRepository, TvShowRepository},
};
use tracing::info;

use super::catalog_import::{CatalogBundle, GenreMap, ImportSummary};

/// Catalog service for browsing and importing movies and TV shows.
#[derive(Clone)]
pub struct CatalogService {
    movie_repo: MovieRepository,
    tv_show_repo: TvShowRepository,
    catalog_repo: CatalogRepository,
    image_base_url: String,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(
        movie_repo: MovieRepository,
        tv_show_repo: TvShowRepository,
        catalog_repo: CatalogRepository,
        config: &Config,
    ) -> Self {
        Self {
            movie_repo,
            tv_show_repo,
            catalog_repo,
            image_base_url: config.catalog.image_base_url.clone(),
        }
    }

    /// List all movies, most popular first.
    pub async fn list_movies(&self) -> AppResult<Vec<movie::Model>> {
        self.movie_repo.find_all().await
    }

    /// List all TV shows, most popular first.
    pub async fn list_tv_shows(&self) -> AppResult<Vec<tv_show::Model>> {
        self.tv_show_repo.find_all().await
    }

    /// Get a movie by ID.
    pub async fn get_movie(&self, id: i32) -> AppResult<movie::Model> {
        self.movie_repo.get_by_id(id).await
    }

    /// Get a TV show by ID.
    pub async fn get_tv_show(&self, id: i32) -> AppResult<tv_show::Model> {
        self.tv_show_repo.get_by_id(id).await
    }

    /// Upsert every record of a bundle.
    ///
    /// Genre names are resolved through a map built from this bundle alone.
    /// A record whose ID repeats replaces the earlier one. Movies and TV
    /// shows are written in one transaction.
    pub async fn import(&self, bundle: CatalogBundle) -> AppResult<ImportSummary> {
        let genres = GenreMap::new(&bundle.genres);

        let movies: BTreeMap<_, _> = bundle.movies.into_iter().map(|r| (r.id, r)).collect();
        let tv_shows: BTreeMap<_, _> = bundle.tv_shows.into_iter().map(|r| (r.id, r)).collect();

        let movies = movies
            .into_values()
            .map(|r| r.into_active_model(&genres, &self.image_base_url))
            .collect();
        let tv_shows = tv_shows
            .into_values()
            .map(|r| r.into_active_model(&genres, &self.image_base_url))
            .collect();

        let (movies, tv_shows) = self.catalog_repo.upsert(movies, tv_shows).await?;
        let summary = ImportSummary { movies, tv_shows };

        info!(
            genres = genres.len(),
            movies = summary.movies,
            tv_shows = summary.tv_shows,
            "Imported catalog bundle"
        );

        Ok(summary)
    }

    /// Read a JSON bundle from disk and import it.
    pub async fn import_file(&self, path: &Path) -> AppResult<ImportSummary> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read catalog {}: {e}", path.display()))
        })?;
        let bundle: CatalogBundle = serde_json::from_slice(&data).map_err(|e| {
            AppError::Config(format!("Invalid catalog {}: {e}", path.display()))
        })?;

        self.import(bundle).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rateit_db::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> CatalogService {
        CatalogService::new(
            MovieRepository::new(Arc::clone(&db)),
            TvShowRepository::new(Arc::clone(&db)),
            CatalogRepository::new(db),
            &Config::with_database_url("sqlite::memory:"),
        )
    }

    #[tokio::test]
    async fn test_get_movie_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<movie::Model>::new()])
                .into_connection(),
        );

        let result = service(db).get_movie(1).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let db = TestDatabase::new().await.unwrap();
        let catalog = service(db.connection());

        let bundle: CatalogBundle = serde_json::from_str(
            r#"{
                "genres": [{"id": 80, "name": "Crime"}, {"id": 18, "name": "Drama"}],
                "movies": [
                    {"id": 5, "title": "Heat", "genre_ids": [80, 18], "popularity": 30.0,
                     "vote_average": 7.9, "poster_path": "/heat.jpg", "release_date": "1995-12-15"},
                    {"id": 6, "title": "Ronin", "genre_ids": [18], "popularity": 12.0,
                     "vote_average": 7.1}
                ],
                "tv_shows": [
                    {"id": 1396, "name": "Breaking Bad", "genre_ids": [18], "popularity": 60.0,
                     "vote_average": 8.9, "number_of_seasons": 5}
                ]
            }"#,
        )
        .unwrap();

        let first = catalog.import(bundle.clone()).await.unwrap();
        let second = catalog.import(bundle).await.unwrap();
        assert_eq!(first, ImportSummary { movies: 2, tv_shows: 1 });
        assert_eq!(first, second);

        let movies = catalog.list_movies().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].name, "Heat");
        assert_eq!(movies[0].genre.as_deref(), Some("Crime"));
        assert_eq!(
            movies[0].posters.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/heat.jpg")
        );

        let show = catalog.get_tv_show(1396).await.unwrap();
        assert_eq!(show.seasons, Some(5));
    }

    #[tokio::test]
    async fn test_import_keeps_last_duplicate() {
        let db = TestDatabase::new().await.unwrap();
        let catalog = service(db.connection());

        let bundle: CatalogBundle = serde_json::from_str(
            r#"{
                "genres": [],
                "movies": [
                    {"id": 1, "title": "Old", "popularity": 1.0, "vote_average": 5.0},
                    {"id": 1, "title": "New", "popularity": 2.0, "vote_average": 6.0}
                ],
                "tv_shows": [
                    {"id": 7, "name": "Dark", "popularity": 9.0, "vote_average": 8.4}
                ]
            }"#,
        )
        .unwrap();

        let summary = catalog.import(bundle).await.unwrap();

        assert_eq!(summary, ImportSummary { movies: 1, tv_shows: 1 });
        assert_eq!(catalog.get_movie(1).await.unwrap().name, "New");
        assert_eq!(catalog.list_movies().await.unwrap().len(), 1);
        assert_eq!(catalog.get_tv_show(7).await.unwrap().name, "Dark");
    }

    #[tokio::test]
    async fn test_import_file_missing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db)
            .import_file(Path::new("/nonexistent/catalog.json"))
            .await;

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
