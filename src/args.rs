use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Terminal PGN library and game viewer")]
pub struct Args {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the library database (defaults to the platform data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory for log files (defaults to the platform data directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// PGN file to import into the library on startup
    #[arg(long)]
    pub pgn: Option<PathBuf>,
}
