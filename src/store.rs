//! SQLite pool setup. The gateway administers an existing database file and never
//! creates one.

use crate::config::Settings;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub fn connect_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .foreign_keys(true)
}

/// Open the pool. Each request borrows one connection and hands it back on drop.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(connect_options(&settings.database_path))
        .await?;
    tracing::info!(database = %settings.database_path.display(), "database pool ready");
    Ok(pool)
}
