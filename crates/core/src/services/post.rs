//! Post service.

use chrono::Utc;
use rateit_common::{AppError, AppResult};
use rateit_db::{
    entities::post,
    repositories::{MovieRepository, PostFilter, PostRepository, TvShowRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Longest accepted tag.
const MAX_TAG_LEN: usize = 128;

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 10000))]
    pub content_text: String,

    #[serde(default, alias = "movieID")]
    pub movie_id: Option<i32>,

    #[serde(default, alias = "tvShowID")]
    pub tv_show_id: Option<i32>,

    /// Comma-delimited tags.
    #[serde(default)]
    pub tags: Option<String>,

    #[serde(default, alias = "pollID")]
    pub poll_id: Option<i32>,
}

/// A post together with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithTags {
    pub post: post::Model,
    pub tags: Vec<String>,
}

/// Split a comma-delimited tag list.
///
/// Tags are trimmed, empty ones dropped and duplicates removed keeping the
/// first occurrence.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    movie_repo: MovieRepository,
    tv_show_repo: TvShowRepository,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        movie_repo: MovieRepository,
        tv_show_repo: TvShowRepository,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            movie_repo,
            tv_show_repo,
        }
    }

    /// Create a post.
    pub async fn create(&self, input: CreatePostInput) -> AppResult<PostWithTags> {
        input.validate()?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title cannot be blank".to_string()));
        }
        if input.content_text.trim().is_empty() {
            return Err(AppError::Validation("Content cannot be blank".to_string()));
        }
        if input.movie_id.is_some() && input.tv_show_id.is_some() {
            return Err(AppError::Validation(
                "A post can discuss a movie or a TV show, not both".to_string(),
            ));
        }

        let tags = input.tags.as_deref().map(parse_tags).unwrap_or_default();
        if tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
            return Err(AppError::Validation(format!(
                "Tags are limited to {MAX_TAG_LEN} characters"
            )));
        }

        self.user_repo.get_by_username(&input.username).await?;
        if let Some(movie_id) = input.movie_id {
            self.movie_repo.get_by_id(movie_id).await?;
        }
        if let Some(tv_show_id) = input.tv_show_id {
            self.tv_show_repo.get_by_id(tv_show_id).await?;
        }

        let model = post::ActiveModel {
            username: Set(input.username),
            title: Set(title),
            content_text: Set(input.content_text),
            date_of_post: Set(Utc::now().into()),
            movie_id: Set(input.movie_id),
            tv_show_id: Set(input.tv_show_id),
            poll_id: Set(input.poll_id),
            upvote_count: Set(0),
            comment_count: Set(0),
            ..Default::default()
        };

        let post = self.post_repo.create_with_tags(model, &tags).await?;
        info!(post_id = post.id, username = %post.username, "Created post");

        Ok(PostWithTags { post, tags })
    }

    /// Get a post by ID.
    pub async fn get(&self, id: i32) -> AppResult<PostWithTags> {
        let post = self.post_repo.get_by_id(id).await?;
        let tags = self
            .post_repo
            .find_tags(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(PostWithTags { post, tags })
    }

    /// Delete a post along with its tags, comments and votes.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let post = self.post_repo.get_by_id(id).await?;
        self.post_repo.delete(&post).await?;
        info!(post_id = id, "Deleted post");
        Ok(())
    }

    /// List posts matching `filter`, newest first. Blank filters are ignored.
    pub async fn search(&self, filter: PostFilter) -> AppResult<Vec<PostWithTags>> {
        let filter = PostFilter {
            search_term: non_blank(filter.search_term),
            username: non_blank(filter.username),
            movie_id: filter.movie_id,
            tv_show_id: filter.tv_show_id,
            tag: non_blank(filter.tag),
        };

        let posts = self.post_repo.search(&filter).await?;
        let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let mut tags = self.post_repo.find_tags(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = tags.remove(&post.id).unwrap_or_default();
                PostWithTags { post, tags }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rateit_db::test_utils::{TestDatabase, seed_movie, seed_tv_show, seed_user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> PostService {
        PostService::new(
            PostRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            MovieRepository::new(Arc::clone(&db)),
            TvShowRepository::new(db),
        )
    }

    fn input(username: &str) -> CreatePostInput {
        CreatePostInput {
            username: username.to_string(),
            title: "Great movie".to_string(),
            content_text: "loved it".to_string(),
            movie_id: None,
            tv_show_id: None,
            tags: None,
            poll_id: None,
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" scifi, ,classic,scifi ,Classic"),
            vec!["scifi", "classic", "Classic"]
        );
        assert!(parse_tags(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_create_with_both_contents_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db)
            .create(CreatePostInput {
                movie_id: Some(1),
                tv_show_id: Some(2),
                ..input("alice")
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_for_unknown_movie_not_found() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();

        let result = service(db.connection())
            .create(CreatePostInput {
                movie_id: Some(404),
                ..input("alice")
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_movie(&db.conn, 5, "Heat", Some("Crime"), 8.0, 30.0)
            .await
            .unwrap();
        let posts = service(db.connection());

        let created = posts
            .create(CreatePostInput {
                movie_id: Some(5),
                tags: Some("crime, heist".to_string()),
                ..input("alice")
            })
            .await
            .unwrap();
        assert_eq!(created.tags, vec!["crime", "heist"]);

        let fetched = posts.get(created.post.id).await.unwrap();
        assert_eq!(fetched, created);

        posts.delete(created.post.id).await.unwrap();
        assert!(matches!(
            posts.get(created.post.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            posts.delete(created.post.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_ignores_blank_filters() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_tv_show(&db.conn, 7, "Severance", Some("Drama"), 8.7, 40.0)
            .await
            .unwrap();
        let posts = service(db.connection());

        posts.create(input("alice")).await.unwrap();
        posts
            .create(CreatePostInput {
                tv_show_id: Some(7),
                title: "Severance S2".to_string(),
                tags: Some("office".to_string()),
                ..input("alice")
            })
            .await
            .unwrap();

        let blank = PostFilter {
            search_term: Some("   ".to_string()),
            username: Some(String::new()),
            tag: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(posts.search(blank).await.unwrap().len(), 2);

        let by_show = PostFilter {
            tv_show_id: Some(7),
            ..Default::default()
        };
        let found = posts.search(by_show).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tags, vec!["office"]);
    }
}
