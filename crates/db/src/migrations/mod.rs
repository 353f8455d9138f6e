//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_posts_table;
mod m20250101_000003_create_likes_table;
mod m20250101_000004_create_follows_table;
mod m20250101_000005_create_hashtags_table;
mod m20250101_000006_create_post_hashtags_table;
mod m20250101_000007_create_activities_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_posts_table::Migration),
            Box::new(m20250101_000003_create_likes_table::Migration),
            Box::new(m20250101_000004_create_follows_table::Migration),
            Box::new(m20250101_000005_create_hashtags_table::Migration),
            Box::new(m20250101_000006_create_post_hashtags_table::Migration),
            Box::new(m20250101_000007_create_activities_table::Migration),
        ]
    }
}
