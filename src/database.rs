use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite, Transaction,
};
use std::str::FromStr;
use tracing::info;

// Async movie review database with SQLx connection pool
pub struct MovieReviewDatabase {
    pub pool: SqlitePool,
}

impl MovieReviewDatabase {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL {}", database_url))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", database_url))?;

        Ok(Self { pool })
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every new SQLite memory connection starts out empty.
    pub async fn new_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite")?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    pub async fn init(&self) -> Result<()> {
        // Movies carry the persisted average; the review list is resolved from `reviews`
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS movies (
                id BLOB PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                release_date TEXT NOT NULL,
                average_rating REAL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reviews (
                id BLOB PRIMARY KEY NOT NULL,
                movie_id BLOB NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
                reviewer_name TEXT,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
                comments TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_movie_id ON reviews(movie_id)")
            .execute(&self.pool)
            .await?;

        info!("Database schema ready");
        Ok(())
    }

    /// Cheap round trip used by the health check.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // Begin a transaction - caller is responsible for commit; dropping it rolls back
    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
