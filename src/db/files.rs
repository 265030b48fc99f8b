//! Library file storage: named PGN files and the active-file pointer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::models::{DEFAULT_FILE_NAME, DEFAULT_FILE_PATH, SAMPLE_GAME, StoredFile};

const ACTIVE_FILE_KEY: &str = "active_file";

/// Turn user input into a `(name, path)` pair: trimmed, with a `.pgn`
/// extension appended when missing. Returns `None` for blank input.
pub fn normalize_file_name(raw: &str) -> Option<(String, String)> {
    let mut name = raw.trim().to_string();
    if name.is_empty() {
        return None;
    }
    if !name.to_lowercase().ends_with(".pgn") {
        name.push_str(".pgn");
    }
    let path = if name.starts_with('/') {
        name.clone()
    } else {
        format!("/{name}")
    };
    Some((name, path))
}

/// Insert the default file with the bundled game when the library is
/// empty, and point the active file at it.
pub async fn ensure_seed(pool: &SqlitePool) -> Result<()> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM files")
        .fetch_one(pool)
        .await
        .context("Failed to count library files")?;
    let count: i64 = row.get("n");

    if count == 0 {
        add_file(pool, DEFAULT_FILE_PATH, DEFAULT_FILE_NAME, SAMPLE_GAME).await?;
        set_active_file(pool, DEFAULT_FILE_PATH).await?;
        info!("Seeded library with the default file");
    }
    Ok(())
}

/// All library files, sorted by name.
pub async fn list_files(pool: &SqlitePool) -> Result<Vec<StoredFile>> {
    let rows = sqlx::query("SELECT path, name, modified_at FROM files ORDER BY name COLLATE NOCASE")
        .fetch_all(pool)
        .await
        .context("Failed to list library files")?;

    let files = rows
        .into_iter()
        .map(|row| {
            let modified_at = DateTime::parse_from_rfc3339(&row.get::<String, _>("modified_at"))
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            StoredFile {
                path: row.get("path"),
                name: row.get("name"),
                modified_at,
            }
        })
        .collect();

    Ok(files)
}

/// Whether a file exists at `path`, compared case-insensitively.
pub async fn file_exists(pool: &SqlitePool, path: &str) -> Result<bool> {
    let row = sqlx::query("SELECT 1 AS one FROM files WHERE LOWER(path) = LOWER(?)")
        .bind(path)
        .fetch_optional(pool)
        .await
        .context("Failed to check for existing file")?;
    Ok(row.is_some())
}

/// Content of the file at `path`, or `None` when it does not exist.
pub async fn get_content(pool: &SqlitePool, path: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT content FROM files WHERE path = ?")
        .bind(path)
        .fetch_optional(pool)
        .await
        .context("Failed to read file content")?;
    Ok(row.map(|r| r.get("content")))
}

pub async fn add_file(pool: &SqlitePool, path: &str, name: &str, content: &str) -> Result<()> {
    sqlx::query("INSERT INTO files (path, name, content, modified_at) VALUES (?, ?, ?, ?)")
        .bind(path)
        .bind(name)
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .context("Failed to add library file")?;
    Ok(())
}

pub async fn set_content(pool: &SqlitePool, path: &str, content: &str) -> Result<()> {
    sqlx::query("UPDATE files SET content = ?, modified_at = ? WHERE path = ?")
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(path)
        .execute(pool)
        .await
        .context("Failed to update file content")?;
    Ok(())
}

/// Rename a file; the active-file pointer follows when it pointed at the
/// old path.
pub async fn rename_file(
    pool: &SqlitePool,
    old_path: &str,
    new_path: &str,
    new_name: &str,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE files SET path = ?, name = ? WHERE path = ?")
        .bind(new_path)
        .bind(new_name)
        .bind(old_path)
        .execute(&mut *tx)
        .await
        .context("Failed to rename library file")?;

    sqlx::query("UPDATE app_state SET value = ? WHERE key = ? AND value = ?")
        .bind(new_path)
        .bind(ACTIVE_FILE_KEY)
        .bind(old_path)
        .execute(&mut *tx)
        .await
        .context("Failed to move active-file pointer")?;

    tx.commit().await?;
    Ok(())
}

/// Delete a file; the active-file pointer falls back to the default file
/// when it pointed at the removed path.
pub async fn remove_file(pool: &SqlitePool, path: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM files WHERE path = ?")
        .bind(path)
        .execute(&mut *tx)
        .await
        .context("Failed to delete library file")?;

    sqlx::query("UPDATE app_state SET value = ? WHERE key = ? AND value = ?")
        .bind(DEFAULT_FILE_PATH)
        .bind(ACTIVE_FILE_KEY)
        .bind(path)
        .execute(&mut *tx)
        .await
        .context("Failed to reset active-file pointer")?;

    tx.commit().await?;
    Ok(())
}

/// Path of the active file; the default file when nothing is stored.
pub async fn active_file(pool: &SqlitePool) -> Result<String> {
    let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
        .bind(ACTIVE_FILE_KEY)
        .fetch_optional(pool)
        .await
        .context("Failed to read active-file pointer")?;
    Ok(row
        .map(|r| r.get("value"))
        .unwrap_or_else(|| DEFAULT_FILE_PATH.to_string()))
}

pub async fn set_active_file(pool: &SqlitePool, path: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO app_state (key, value) VALUES (?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(ACTIVE_FILE_KEY)
    .bind(path)
    .execute(pool)
    .await
    .context("Failed to set active-file pointer")?;
    Ok(())
}
