//! Test utilities for database operations.
//!
//! Provides an in-memory SQLite database with the real migrations applied,
//! plus a few fixture helpers for seeding rows.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{movie, tv_show, user};
use crate::migrations::Migrator;

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database URL.
    pub url: String,
    /// Pool size. Keep at 1 for `sqlite::memory:`.
    pub max_connections: u32,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("TEST_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            max_connections: 1,
        }
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a fresh database and run every migration.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Create a test database with custom configuration.
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database,
    /// so the default pool holds exactly one.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(&config.url);
        opt.max_connections(config.max_connections.max(1))
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(url = %config.url, "Created test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }
}

/// Insert a user with a placeholder password hash.
pub async fn seed_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("not-a-real-hash".to_string()),
        bio: Set(None),
        account_type: Set(user::AccountType::Public),
        pfp: Set(None),
        post_count: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
}

/// Insert a movie.
pub async fn seed_movie(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
    genre: Option<&str>,
    rating: f64,
    popularity: f64,
) -> Result<movie::Model, DbErr> {
    movie::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        genre: Set(genre.map(str::to_string)),
        posters: Set(Some(format!("/posters/movie-{id}.jpg"))),
        popularity: Set(popularity),
        rating: Set(rating),
        release_year: Set(Some(2020)),
        description: Set(Some(format!("About {name}"))),
        director: Set(None),
    }
    .insert(db)
    .await
}

/// Insert a TV show.
pub async fn seed_tv_show(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
    genre: Option<&str>,
    rating: f64,
    popularity: f64,
) -> Result<tv_show::Model, DbErr> {
    tv_show::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        genre: Set(genre.map(str::to_string)),
        posters: Set(Some(format!("/posters/tv-{id}.jpg"))),
        popularity: Set(popularity),
        rating: Set(rating),
        release_year: Set(Some(2019)),
        seasons: Set(Some(1)),
        episodes: Set(Some(8)),
        description: Set(Some(format!("About {name}"))),
        director: Set(None),
    }
    .insert(db)
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::User;
    use sea_orm::EntityTrait;

    #[test]
    fn test_db_config_default_is_in_memory() {
        let config = TestDbConfig::default();
        if std::env::var("TEST_DATABASE_URL").is_err() {
            assert_eq!(config.url, "sqlite::memory:");
        }
        assert_eq!(config.max_connections, 1);
    }

    #[tokio::test]
    async fn test_migrations_apply_and_seed() {
        let db = TestDatabase::new().await.unwrap();
        let conn = db.connection();

        seed_user(&conn, "alice").await.unwrap();
        let found = User::find_by_id("alice").one(conn.as_ref()).await.unwrap();

        assert_eq!(found.unwrap().email, "alice@example.com");
    }
}
