pub mod files;
pub mod models;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Get the path to the library database using the platform-specific data
/// directory.
pub fn default_db_path() -> Result<PathBuf> {
    let mut path = dirs::data_dir()
        .context("Unable to determine data directory for your platform")?;

    path.push("rookery");

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&path)
        .context("Failed to create rookery data directory")?;

    path.push("library.db");
    Ok(path)
}

/// Create a connection pool to the SQLite database at `path`
pub async fn create_pool(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let dir = tempfile::TempDir::new().unwrap();
        let pool = create_pool(&dir.path().join("library.db")).await;
        assert!(pool.is_ok());
    }
}
