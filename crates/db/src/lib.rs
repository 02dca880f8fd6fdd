//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The ledger engine lives here: every balance-affecting mutation runs as one
//! database transaction combining the ownership check, the entity mutation,
//! and the posting appends planned by `fintrack-core`.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{AccountRepository, CategoryRepository, LedgerRepository, UserRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use fintrack_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the application configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}
