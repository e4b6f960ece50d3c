//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data. The assignment
//! dedup key is enforced here as a real UNIQUE index so that concurrent
//! identical writes cannot slip past the reconciler's pre-check.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::grid::{FALLBACK_COLOR, FALLBACK_KIND_CODE, FALLBACK_KIND_NAME};

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

    // Seed the catalog and the base time grid on first startup
    seed_defaults(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS professionals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            initials TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity_kinds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            color TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            interval_minutes INTEGER,
            is_base INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            professional_id INTEGER NOT NULL,
            weekday TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            activity TEXT NOT NULL,
            location TEXT,
            notes TEXT,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // The dedup key. Insert races resolve here, not in application code.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_assignments_dedup_key
            ON assignments(professional_id, weekday, start_time, end_time);
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_assignments_weekday ON assignments(weekday);
        CREATE INDEX IF NOT EXISTS idx_assignments_professional ON assignments(professional_id);
        CREATE INDEX IF NOT EXISTS idx_time_slots_start ON time_slots(start_time);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Default activity kinds the board ships with. The catalog stays
/// user-extensible; these only fill an empty table.
const DEFAULT_ACTIVITY_KINDS: &[(&str, &str, &str)] = &[
    ("aula", "Aula", "#3b82f6"),
    ("reuniao", "Reunião", "#8b5cf6"),
    ("plantao", "Plantão", "#22c55e"),
    ("estudo", "Estudo", "#f59e0b"),
    ("evento", "Evento", "#ef4444"),
    ("ferias", "Férias", "#06b6d4"),
    ("licenca", "Licença", "#64748b"),
];

/// Seed default activity kinds and 30-minute base slots when the
/// corresponding tables are empty.
async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let kinds: i64 = sqlx::query("SELECT COUNT(*) AS n FROM activity_kinds")
        .fetch_one(pool)
        .await?
        .get("n");

    if kinds == 0 {
        tracing::info!("Seeding default activity kinds");
        for (code, name, color) in DEFAULT_ACTIVITY_KINDS {
            sqlx::query("INSERT INTO activity_kinds (code, name, color) VALUES (?, ?, ?)")
                .bind(code)
                .bind(name)
                .bind(color)
                .execute(pool)
                .await?;
        }
        // The neutral kind backs every empty cell
        sqlx::query("INSERT INTO activity_kinds (code, name, color) VALUES (?, ?, ?)")
            .bind(FALLBACK_KIND_CODE)
            .bind(FALLBACK_KIND_NAME)
            .bind(FALLBACK_COLOR)
            .execute(pool)
            .await?;
    }

    let slots: i64 = sqlx::query("SELECT COUNT(*) AS n FROM time_slots")
        .fetch_one(pool)
        .await?
        .get("n");

    if slots == 0 {
        tracing::info!("Seeding default time slots");
        // 30-minute base grid, morning and afternoon blocks
        for block in [(8 * 60, 12 * 60), (13 * 60, 18 * 60)] {
            let mut start = block.0;
            while start < block.1 {
                let end = start + 30;
                sqlx::query(
                    "INSERT INTO time_slots (start_time, end_time, interval_minutes, is_base) VALUES (?, ?, 30, 1)"
                )
                .bind(format_minutes(start))
                .bind(format_minutes(end))
                .execute(pool)
                .await?;
                start = end;
            }
        }
    }

    Ok(())
}

fn format_minutes(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
