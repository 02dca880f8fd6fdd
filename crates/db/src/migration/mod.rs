//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The schema is written with
//! the portable statement builder so the same migrations run on Postgres in
//! production and on SQLite in the integration tests.

pub use sea_orm_migration::prelude::*;

mod m20260823_000001_initial;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260823_000001_initial::Migration)]
    }
}
