//! Recommendation service.
//!
//! Recommends catalog items sharing a genre with what the user already has
//! on their watchlist, best rated first. Without a genre signal it falls
//! back to the most popular items.

use rateit_common::{AppResult, Config};
use rateit_db::{
    entities::{movie, tv_show, watchlist_entry::ContentKind},
    repositories::{MovieRepository, TvShowRepository, UserRepository, WatchlistRepository},
};
use tracing::debug;

/// Recommended movies and TV shows for one user.
#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    pub movies: Vec<movie::Model>,
    pub tv_shows: Vec<tv_show::Model>,
}

/// Distinct genres in first-seen order.
fn distinct_genres<'a>(genres: impl Iterator<Item = Option<&'a String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for genre in genres.flatten() {
        if !out.contains(genre) {
            out.push(genre.clone());
        }
    }
    out
}

/// Recommendation service for business logic.
#[derive(Clone)]
pub struct RecommendationService {
    watchlist_repo: WatchlistRepository,
    user_repo: UserRepository,
    movie_repo: MovieRepository,
    tv_show_repo: TvShowRepository,
    limit: u64,
}

impl RecommendationService {
    /// Create a new recommendation service.
    #[must_use]
    pub fn new(
        watchlist_repo: WatchlistRepository,
        user_repo: UserRepository,
        movie_repo: MovieRepository,
        tv_show_repo: TvShowRepository,
        config: &Config,
    ) -> Self {
        Self {
            watchlist_repo,
            user_repo,
            movie_repo,
            tv_show_repo,
            limit: config.recommendations.limit,
        }
    }

    /// Recommendations for a user.
    pub async fn recommend(&self, username: &str) -> AppResult<Recommendations> {
        self.user_repo.get_by_username(username).await?;

        let movies = self.recommend_movies(username).await?;
        let tv_shows = self.recommend_tv_shows(username).await?;

        debug!(
            username,
            movies = movies.len(),
            tv_shows = tv_shows.len(),
            "Computed recommendations"
        );
        Ok(Recommendations { movies, tv_shows })
    }

    async fn recommend_movies(&self, username: &str) -> AppResult<Vec<movie::Model>> {
        let listed = self
            .watchlist_repo
            .content_ids(username, ContentKind::Movie)
            .await?;
        let watched = self.movie_repo.find_by_ids(&listed).await?;
        let genres = distinct_genres(watched.iter().map(|m| m.genre.as_ref()));

        let by_genre = self
            .movie_repo
            .find_by_genres(&genres, &listed, self.limit)
            .await?;
        if !by_genre.is_empty() {
            return Ok(by_genre);
        }

        self.movie_repo.find_most_popular(&listed, self.limit).await
    }

    async fn recommend_tv_shows(&self, username: &str) -> AppResult<Vec<tv_show::Model>> {
        let listed = self
            .watchlist_repo
            .content_ids(username, ContentKind::TvShow)
            .await?;
        let watched = self.tv_show_repo.find_by_ids(&listed).await?;
        let genres = distinct_genres(watched.iter().map(|s| s.genre.as_ref()));

        let by_genre = self
            .tv_show_repo
            .find_by_genres(&genres, &listed, self.limit)
            .await?;
        if !by_genre.is_empty() {
            return Ok(by_genre);
        }

        self.tv_show_repo
            .find_most_popular(&listed, self.limit)
            .await
    }
}
