//! Database initialization
//!
//! Opens (or creates) the SQLite database file and ensures the schema exists.

use std::path::Path;

use meetwatch_common::{config, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Open a connection pool against the database file, creating file and
/// schema as needed
pub async fn open_pool(db_path: &Path) -> Result<Pool<Sqlite>> {
    config::ensure_parent_dir(db_path)?;

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    info!("Database ready at {}", db_path.display());

    Ok(pool)
}

/// Create the meetings table and indexes if they do not exist
///
/// Timestamps are TEXT in `YYYY-MM-DDTHH:MM:SS` form; the recurrence pattern
/// is a JSON TEXT column, NULL for one-off meetings.
pub async fn create_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meetings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            link TEXT NOT NULL,
            scheduled_time TEXT NOT NULL,
            duration INTEGER NOT NULL,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            recurrence_pattern TEXT,
            alert_timing INTEGER NOT NULL DEFAULT 5,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_meetings_active_time
         ON meetings (is_active, scheduled_time)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
