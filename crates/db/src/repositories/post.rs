//! Post repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Post, PostTag, User, post, post_tag, user};
use rateit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, Query},
};

/// Filters for listing posts. Every `Some` filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring of the title or the content.
    pub search_term: Option<String>,
    /// Author.
    pub username: Option<String>,
    /// Discussed movie.
    pub movie_id: Option<i32>,
    /// Discussed TV show.
    pub tv_show_id: Option<i32>,
    /// Exact tag.
    pub tag: Option<String>,
}

/// Build a `LIKE` pattern matching `term` anywhere, with wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post: {id}")))
    }

    /// Create a post with its tags and bump the author's post count.
    pub async fn create_with_tags(
        &self,
        model: post::ActiveModel,
        tags: &[String],
    ) -> AppResult<post::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let post = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !tags.is_empty() {
            let rows = tags.iter().enumerate().map(|(position, tag)| post_tag::ActiveModel {
                post_id: Set(post.id),
                tag: Set(tag.clone()),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            });
            PostTag::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        User::update_many()
            .col_expr(
                user::Column::PostCount,
                Expr::col(user::Column::PostCount).add(1),
            )
            .filter(user::Column::Username.eq(&post.username))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Delete a post and decrement the author's post count.
    ///
    /// Tags, comments and votes go with it through `ON DELETE CASCADE`.
    pub async fn delete(&self, post: &post::Model) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Post::delete_by_id(post.id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Post: {}", post.id)));
        }

        User::update_many()
            .col_expr(
                user::Column::PostCount,
                Expr::cust("CASE WHEN post_count > 0 THEN post_count - 1 ELSE 0 END"),
            )
            .filter(user::Column::Username.eq(&post.username))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts matching `filter`, newest first.
    pub async fn search(&self, filter: &PostFilter) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find();

        if let Some(term) = filter.search_term.as_deref() {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::ContentText)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        if let Some(username) = filter.username.as_deref() {
            query = query.filter(post::Column::Username.eq(username));
        }

        if let Some(movie_id) = filter.movie_id {
            query = query.filter(post::Column::MovieId.eq(movie_id));
        }

        if let Some(tv_show_id) = filter.tv_show_id {
            query = query.filter(post::Column::TvShowId.eq(tv_show_id));
        }

        if let Some(tag) = filter.tag.as_deref() {
            query = query.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTag)
                        .and_where(post_tag::Column::Tag.eq(tag))
                        .to_owned(),
                ),
            );
        }

        query
            .order_by_desc(post::Column::DateOfPost)
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Load the tags of several posts, keyed by post ID, in the order given.
    pub async fn find_tags(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = PostTag::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(post_tag::Column::PostId)
            .order_by_asc(post_tag::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut tags: HashMap<i32, Vec<String>> = HashMap::new();
        for row in rows {
            tags.entry(row.post_id).or_default().push(row.tag);
        }
        Ok(tags)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{TestDatabase, seed_movie, seed_user};
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, NotSet};

    fn create_test_post(id: i32, username: &str) -> post::Model {
        post::Model {
            id,
            username: username.to_string(),
            title: "Great movie".to_string(),
            content_text: "loved it".to_string(),
            date_of_post: Utc::now().into(),
            movie_id: Some(5),
            tv_show_id: None,
            poll_id: None,
            upvote_count: 0,
            comment_count: 0,
        }
    }

    fn new_post(
        username: &str,
        title: &str,
        content: &str,
        minutes_ago: i64,
    ) -> post::ActiveModel {
        post::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            title: Set(title.to_string()),
            content_text: Set(content.to_string()),
            date_of_post: Set((Utc::now() - Duration::minutes(minutes_ago)).into()),
            movie_id: Set(None),
            tv_show_id: Set(None),
            poll_id: Set(None),
            upvote_count: Set(0),
            comment_count: Set(0),
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Dune"), "%dune%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post(1, "alice")]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let post = repo.find_by_id(1).await.unwrap().unwrap();

        assert_eq!(post.username, "alice");
        assert_eq!(post.movie_id, Some(5));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);

        assert!(matches!(repo.get_by_id(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_and_delete_maintain_post_count() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        let repo = PostRepository::new(db.connection());

        let tags = vec!["scifi".to_string(), "classic".to_string()];
        let post = repo
            .create_with_tags(new_post("alice", "Alien", "in space", 0), &tags)
            .await
            .unwrap();

        let author = User::find_by_id("alice")
            .one(db.conn.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(author.post_count, 1);

        let loaded = repo.find_tags(&[post.id]).await.unwrap();
        assert_eq!(loaded.get(&post.id), Some(&tags));

        repo.delete(&post).await.unwrap();

        let author = User::find_by_id("alice")
            .one(db.conn.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(author.post_count, 0);
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
        assert!(repo.find_tags(&[post.id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostRepository::new(db.connection());

        let result = repo.delete(&create_test_post(42, "nobody")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_filters_combine() {
        let db = TestDatabase::new().await.unwrap();
        seed_user(&db.conn, "alice").await.unwrap();
        seed_user(&db.conn, "bob").await.unwrap();
        seed_movie(&db.conn, 5, "Heat", Some("Crime"), 8.0, 30.0)
            .await
            .unwrap();
        let repo = PostRepository::new(db.connection());

        let mut heat = new_post("alice", "Heat rewatch", "Pacino vs De Niro", 30);
        heat.movie_id = Set(Some(5));
        let heat = repo
            .create_with_tags(heat, &["crime".to_string()])
            .await
            .unwrap();
        let dune = repo
            .create_with_tags(new_post("bob", "Dune", "The spice must flow", 20), &[])
            .await
            .unwrap();
        let promo = repo
            .create_with_tags(new_post("alice", "Sale", "100% off HEAT tickets", 10), &[])
            .await
            .unwrap();

        let all = repo.search(&PostFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![promo.id, dune.id, heat.id]);

        let term = PostFilter {
            search_term: Some("heat".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.search(&term).await.unwrap().len(), 2);

        let literal_percent = PostFilter {
            search_term: Some("100%".to_string()),
            ..Default::default()
        };
        let found = repo.search(&literal_percent).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, promo.id);

        let combined = PostFilter {
            search_term: Some("heat".to_string()),
            movie_id: Some(5),
            ..Default::default()
        };
        let found = repo.search(&combined).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, heat.id);

        let by_tag = PostFilter {
            tag: Some("crime".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.search(&by_tag).await.unwrap()[0].id, heat.id);

        let by_author = PostFilter {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.search(&by_author).await.unwrap()[0].id, dune.id);
    }
}
