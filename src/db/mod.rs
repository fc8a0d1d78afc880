//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data. The schema-level
//! CHECK on `volunteers_needed` and the unique applicant index back the
//! capacity ledger's invariants.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            category TEXT,
            location TEXT,
            volunteers_needed INTEGER NOT NULL CHECK (volunteers_needed >= 0),
            deadline TEXT,
            thumbnail TEXT,
            organizer_name TEXT,
            organizer_email TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS requests (
            id TEXT PRIMARY KEY,
            post_id TEXT NOT NULL,
            post_title TEXT,
            volunteer_name TEXT,
            volunteer_email TEXT NOT NULL,
            organizer_email TEXT NOT NULL,
            suggestion TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One live request per applicant per post, enforced by the store
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_requests_applicant
            ON requests(post_id, volunteer_email);
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_posts_title ON posts(title);
        CREATE INDEX IF NOT EXISTS idx_posts_deadline ON posts(deadline);
        CREATE INDEX IF NOT EXISTS idx_posts_organizer_email ON posts(organizer_email);
        CREATE INDEX IF NOT EXISTS idx_requests_volunteer_email ON requests(volunteer_email);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
