use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS sports (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT,
        image_url TEXT
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS skills (
        id INTEGER PRIMARY KEY,
        sport_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        slug TEXT NOT NULL,
        description TEXT,
        UNIQUE (sport_id, slug),
        FOREIGN KEY (sport_id) REFERENCES sports(id) ON DELETE CASCADE
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS videos (
        id INTEGER PRIMARY KEY,
        skill_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        video_url TEXT NOT NULL,
        duration_secs INTEGER CHECK (duration_secs IS NULL OR duration_secs >= 0),
        uploaded_by TEXT,
        FOREIGN KEY (skill_id) REFERENCES skills(id) ON DELETE CASCADE
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS trainers (
        id INTEGER PRIMARY KEY,
        sport_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        contact TEXT NOT NULL,
        hourly_rate_cents INTEGER NOT NULL CHECK (hourly_rate_cents >= 0),
        experience_years INTEGER CHECK (experience_years IS NULL OR experience_years >= 0),
        specialties TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        FOREIGN KEY (sport_id) REFERENCES sports(id) ON DELETE CASCADE
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS user_progress (
        id INTEGER PRIMARY KEY,
        user_id TEXT NOT NULL,
        sport_id INTEGER NOT NULL,
        skill_key TEXT NOT NULL,
        skill_name TEXT NOT NULL,
        videos_watched INTEGER NOT NULL CHECK (videos_watched >= 1),
        updated_at TEXT NOT NULL,
        FOREIGN KEY (sport_id) REFERENCES sports(id) ON DELETE CASCADE
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS accounts (
        user_id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    ",
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_user_progress_triple
        ON user_progress (user_id, sport_id, skill_key);
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_videos_skill
        ON videos (skill_id, id);
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_trainers_sport_rate
        ON trainers (sport_id, hourly_rate_cents);
    ",
];

/// Applies versioned schema migrations.
///
/// Each version runs inside one transaction and is recorded in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: catalog, progress and accounts.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1 {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
