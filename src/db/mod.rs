pub mod queries;
pub mod transfer;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

use crate::config::DatabaseSettings;

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(settings.url())?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

/// A single-connection in-memory database with migrations applied.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool is pinned to one
/// connection that never expires.
pub async fn in_memory_pool() -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
