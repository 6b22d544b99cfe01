//! Database migrations.
//!
//! Schema migrations for the database. They are written to run on both
//! PostgreSQL and SQLite.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_movie_table;
mod m20250101_000003_create_tv_show_table;
mod m20250101_000004_create_post_table;
mod m20250101_000005_create_comment_table;
mod m20250101_000006_create_vote_tables;
mod m20250101_000007_create_watchlist_entry_table;
mod m20250101_000008_create_friendship_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_movie_table::Migration),
            Box::new(m20250101_000003_create_tv_show_table::Migration),
            Box::new(m20250101_000004_create_post_table::Migration),
            Box::new(m20250101_000005_create_comment_table::Migration),
            Box::new(m20250101_000006_create_vote_tables::Migration),
            Box::new(m20250101_000007_create_watchlist_entry_table::Migration),
            Box::new(m20250101_000008_create_friendship_table::Migration),
        ]
    }
}
