use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Opens the SQLite database behind `database_url` and brings the schema up to date.
pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    if !database_url.starts_with("sqlite:") {
        return Err(anyhow::anyhow!("DATABASE_URL must start with sqlite:"));
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await
        .context("Failed to connect to SQLite")?;

    migrate(&pool).await?;
    info!("Database ready at {}", database_url);

    Ok(pool)
}

/// Single-connection in-memory database with the full schema applied.
///
/// The connection is never recycled, otherwise the database would vanish with it.
pub async fn memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .context("Invalid in-memory URL")?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to open in-memory SQLite")?;

    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}
