//! Watchlist service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rateit_common::{AppError, AppResult, IdGenerator};
use rateit_db::{
    entities::{
        movie, tv_show,
        watchlist_entry::{self, ContentKind},
    },
    repositories::{MovieRepository, TvShowRepository, UserRepository, WatchlistRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

/// Reference to one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRef {
    Movie(i32),
    TvShow(i32),
}

impl ContentRef {
    /// Build a reference from a pair of optional ids. Exactly one must be set.
    pub fn from_ids(movie_id: Option<i32>, tv_show_id: Option<i32>) -> AppResult<Self> {
        match (movie_id, tv_show_id) {
            (Some(id), None) => Ok(Self::Movie(id)),
            (None, Some(id)) => Ok(Self::TvShow(id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Provide either a movie or a TV show, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "A movie or TV show id is required".to_string(),
            )),
        }
    }

    #[must_use]
    pub const fn kind(self) -> ContentKind {
        match self {
            Self::Movie(_) => ContentKind::Movie,
            Self::TvShow(_) => ContentKind::TvShow,
        }
    }

    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Movie(id) | Self::TvShow(id) => id,
        }
    }
}

/// Input for adding content to a watchlist.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchlistInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[serde(default, alias = "movieID")]
    pub movie_id: Option<i32>,

    #[serde(default, alias = "tvShowID")]
    pub tv_show_id: Option<i32>,
}

/// A watchlist entry joined with its catalog row, in one shape for both kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    pub poster: Option<String>,
    pub genre: Option<String>,
    pub rating: f64,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistItem {
    fn from_movie(movie: movie::Model, added_at: DateTime<Utc>) -> Self {
        Self {
            id: movie.id,
            kind: ContentKind::Movie,
            title: movie.name,
            poster: movie.posters,
            genre: movie.genre,
            rating: movie.rating,
            description: movie.description,
            year: movie.release_year,
            director: movie.director,
            added_at,
        }
    }

    fn from_tv_show(show: tv_show::Model, added_at: DateTime<Utc>) -> Self {
        Self {
            id: show.id,
            kind: ContentKind::TvShow,
            title: show.name,
            poster: show.posters,
            genre: show.genre,
            rating: show.rating,
            description: show.description,
            year: show.release_year,
            director: show.director,
            added_at,
        }
    }
}

/// Watchlist service for business logic.
#[derive(Clone)]
pub struct WatchlistService {
    watchlist_repo: WatchlistRepository,
    user_repo: UserRepository,
    movie_repo: MovieRepository,
    tv_show_repo: TvShowRepository,
    id_gen: IdGenerator,
}

impl WatchlistService {
    /// Create a new watchlist service.
    #[must_use]
    pub fn new(
        watchlist_repo: WatchlistRepository,
        user_repo: UserRepository,
        movie_repo: MovieRepository,
        tv_show_repo: TvShowRepository,
    ) -> Self {
        Self {
            watchlist_repo,
            user_repo,
            movie_repo,
            tv_show_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add content to a watchlist. Returns `false` if it was already there.
    pub async fn add(&self, input: AddToWatchlistInput) -> AppResult<bool> {
        input.validate()?;
        let content = ContentRef::from_ids(input.movie_id, input.tv_show_id)?;

        self.user_repo.get_by_username(&input.username).await?;
        match content {
            ContentRef::Movie(id) => {
                self.movie_repo.get_by_id(id).await?;
            }
            ContentRef::TvShow(id) => {
                self.tv_show_repo.get_by_id(id).await?;
            }
        }

        let model = watchlist_entry::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            content_kind: Set(content.kind()),
            content_id: Set(content.id()),
            created_at: Set(Utc::now().into()),
        };

        let added = self.watchlist_repo.add(model).await?;
        debug!(username = %input.username, ?content, added, "Added to watchlist");
        Ok(added)
    }

    /// Remove content from a watchlist.
    pub async fn remove(&self, username: &str, content: ContentRef) -> AppResult<()> {
        let removed = self
            .watchlist_repo
            .remove(username, content.kind(), content.id())
            .await?;

        if !removed {
            return Err(AppError::NotFound(format!(
                "Watchlist entry: {username}/{}",
                content.id()
            )));
        }

        debug!(username, ?content, "Removed from watchlist");
        Ok(())
    }

    /// A user's watchlist, newest first.
    pub async fn list(&self, username: &str) -> AppResult<Vec<WatchlistItem>> {
        let entries = self.watchlist_repo.find_by_user(username).await?;

        let movie_ids: Vec<i32> = entries
            .iter()
            .filter(|e| e.content_kind == ContentKind::Movie)
            .map(|e| e.content_id)
            .collect();
        let show_ids: Vec<i32> = entries
            .iter()
            .filter(|e| e.content_kind == ContentKind::TvShow)
            .map(|e| e.content_id)
            .collect();

        let mut movies: HashMap<i32, movie::Model> = self
            .movie_repo
            .find_by_ids(&movie_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let mut shows: HashMap<i32, tv_show::Model> = self
            .tv_show_repo
            .find_by_ids(&show_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let added_at = entry.created_at.with_timezone(&Utc);
            let item = match entry.content_kind {
                ContentKind::Movie => movies
                    .remove(&entry.content_id)
                    .map(|m| WatchlistItem::from_movie(m, added_at)),
                ContentKind::TvShow => shows
                    .remove(&entry.content_id)
                    .map(|s| WatchlistItem::from_tv_show(s, added_at)),
            };

            match item {
                Some(item) => items.push(item),
                None => warn!(
                    entry_id = %entry.id,
                    content_id = entry.content_id,
                    "Watchlist entry points at missing catalog row"
                ),
            }
        }

        Ok(items)
    }

    /// Number of entries on a user's watchlist.
    pub async fn count(&self, username: &str) -> AppResult<u64> {
        self.watchlist_repo.count_by_user(username).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rateit_db::test_utils::{TestDatabase, seed_movie, seed_tv_show, seed_user};
    use std::sync::Arc;

    fn service(db: &TestDatabase) -> WatchlistService {
        let conn = db.connection();
        WatchlistService::new(
            WatchlistRepository::new(Arc::clone(&conn)),
            UserRepository::new(Arc::clone(&conn)),
            MovieRepository::new(Arc::clone(&conn)),
            TvShowRepository::new(conn),
        )
    }

    fn add_input(movie_id: Option<i32>, tv_show_id: Option<i32>) -> AddToWatchlistInput {
        AddToWatchlistInput {
            username: "alice".to_string(),
            movie_id,
            tv_show_id,
        }
    }

    #[test]
    fn test_content_ref_requires_exactly_one_id() {
        assert_eq!(
            ContentRef::from_ids(Some(5), None).unwrap(),
            ContentRef::Movie(5)
        );
        assert_eq!(
            ContentRef::from_ids(None, Some(7)).unwrap(),
            ContentRef::TvShow(7)
        );
        assert!(matches!(
            ContentRef::from_ids(Some(5), Some(7)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            ContentRef::from_ids(None, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_input_accepts_legacy_field_names() {
        let input: AddToWatchlistInput =
            serde_json::from_str(r#"{"username":"alice","movieID":5}"#).unwrap();
        assert_eq!(input.movie_id, Some(5));
        assert_eq!(input.tv_show_id, None);
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_movie(&db.conn, 5, "Heat", Some("Crime"), 8.0, 30.0)
            .await
            .unwrap();
        let watchlist = service(&db);

        assert!(watchlist.list("alice").await.unwrap().is_empty());

        assert!(watchlist.add(add_input(Some(5), None)).await.unwrap());
        assert!(!watchlist.add(add_input(Some(5), None)).await.unwrap());

        let items = watchlist.list("alice").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 5);
        assert_eq!(items[0].kind, ContentKind::Movie);
        assert_eq!(items[0].title, "Heat");
        assert_eq!(watchlist.count("alice").await.unwrap(), 1);

        watchlist
            .remove("alice", ContentRef::Movie(5))
            .await
            .unwrap();
        assert!(watchlist.list("alice").await.unwrap().is_empty());

        let again = watchlist.remove("alice", ContentRef::Movie(5)).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_movie_and_show_with_same_id_are_distinct() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_movie(&db.conn, 5, "Heat", Some("Crime"), 8.0, 30.0)
            .await
            .unwrap();
        seed_tv_show(&db.conn, 5, "Severance", Some("Drama"), 8.7, 40.0)
            .await
            .unwrap();
        let watchlist = service(&db);

        assert!(watchlist.add(add_input(Some(5), None)).await.unwrap());
        assert!(watchlist.add(add_input(None, Some(5))).await.unwrap());

        let items = watchlist.list("alice").await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.kind == ContentKind::TvShow && i.title == "Severance"));
        assert!(items.iter().any(|i| i.kind == ContentKind::Movie && i.title == "Heat"));
    }

    #[tokio::test]
    async fn test_add_missing_content_or_user() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        let watchlist = service(&db);

        let missing_movie = watchlist.add(add_input(Some(404), None)).await;
        assert!(matches!(missing_movie, Err(AppError::NotFound(_))));

        let ghost = watchlist
            .add(AddToWatchlistInput {
                username: "ghost".to_string(),
                movie_id: Some(1),
                tv_show_id: None,
            })
            .await;
        assert!(matches!(ghost, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_item_serializes_type_field() {
        let item = WatchlistItem {
            id: 5,
            kind: ContentKind::TvShow,
            title: "Severance".to_string(),
            poster: None,
            genre: Some("Drama".to_string()),
            rating: 8.7,
            description: None,
            year: Some(2022),
            director: None,
            added_at: Utc::now(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "tvshow");
        assert_eq!(json["id"], 5);
        assert!(json.get("addedAt").is_some());
    }
}
