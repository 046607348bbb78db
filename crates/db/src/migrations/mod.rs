//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_friendship_table;
mod m20250101_000002_create_film_like_table;
mod m20250101_000003_create_review_mark_table;
mod m20250101_000004_create_feed_event_table;
mod m20250101_000005_create_deleted_review_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_friendship_table::Migration),
            Box::new(m20250101_000002_create_film_like_table::Migration),
            Box::new(m20250101_000003_create_review_mark_table::Migration),
            Box::new(m20250101_000004_create_feed_event_table::Migration),
            Box::new(m20250101_000005_create_deleted_review_table::Migration),
        ]
    }
}
