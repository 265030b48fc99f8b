use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rookery::{
    args::Args,
    config::{self, Settings},
    db,
    sync::RemoteClient,
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = match args.log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "rookery.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let settings = Settings::load(&config_path);
    if !config_path.exists() {
        settings
            .save(&config_path)
            .context("Failed to write default config")?;
    }

    let db_path = match args.db {
        Some(path) => path,
        None => db::default_db_path()?,
    };
    let pool = db::create_pool(&db_path).await?;
    db::files::ensure_seed(&pool).await?;

    if let Some(ref pgn_path) = args.pgn {
        import_startup_file(&pool, pgn_path).await?;
    }

    let remote = RemoteClient::from_config(&settings.sync);

    info!("Starting rookery");
    ui::run_ui(pool, remote)
}

fn default_log_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Unable to determine data directory for your platform")?
        .join("rookery")
        .join("logs");
    Ok(dir)
}

/// Imports a PGN file passed on the command line and makes it the active
/// library file.
async fn import_startup_file(pool: &sqlx::SqlitePool, pgn_path: &std::path::Path) -> Result<()> {
    let content = std::fs::read_to_string(pgn_path)
        .with_context(|| format!("Failed to read {}", pgn_path.display()))?;

    let raw_name = pgn_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("imported.pgn");
    let (name, path) = db::files::normalize_file_name(raw_name)
        .with_context(|| format!("Invalid file name {raw_name:?}"))?;

    if db::files::file_exists(pool, &path).await? {
        db::files::set_content(pool, &path, &content).await?;
    } else {
        db::files::add_file(pool, &path, &name, &content).await?;
    }
    db::files::set_active_file(pool, &path).await?;

    info!("Imported {} as {}", pgn_path.display(), path);
    Ok(())
}
