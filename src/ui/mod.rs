mod app;
mod handlers;
mod rendering;
#[cfg(test)]
mod tests;
mod types;

pub use app::App;
pub use types::LogBuffer;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sqlx::SqlitePool;
use std::io::stdout;

use crate::sync::RemoteClient;

/// Entry point for running the UI.
pub fn run_ui(db_pool: SqlitePool, remote: Option<RemoteClient>) -> Result<()> {
    let logs = LogBuffer::new();

    let mut app = App::new(logs.clone(), db_pool, remote);

    let mut stdout = stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
