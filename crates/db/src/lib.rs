//! PostgreSQL persistence for the webcam module.
//!
//! - [`models`]: row structs, projections and DTOs.
//! - [`repositories`]: zero-sized repos with async associated functions.
//! - [`filter_sql`]: renders filter predicate trees and sort keys to SQL.

use sqlx::postgres::PgPoolOptions;

pub mod filter_sql;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
