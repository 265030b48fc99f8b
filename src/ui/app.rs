use std::{fmt::Display, io::Stdout};

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::CrosstermBackend};
use shakmaty::Square;
use sqlx::SqlitePool;
use tracing::info;

use crate::{db::models::StoredFile, game::GameSession, pgn::GameEntry, sync::RemoteClient};

use super::types::{Focus, LogBuffer, Mode, Notice, PieceGlyphs, Prompt};

/// Main application state container.
pub struct App {
    pub(in crate::ui) session: GameSession,
    pub(in crate::ui) files: Vec<StoredFile>,
    pub(in crate::ui) games: Vec<GameEntry>,
    pub(in crate::ui) active_path: String,
    pub(in crate::ui) active_content: String,
    pub(in crate::ui) selected_file: usize,
    pub(in crate::ui) selected_game: usize,
    /// Index into `games` of the game currently loaded in the session.
    pub(in crate::ui) loaded_game: Option<usize>,
    pub(in crate::ui) mode: Mode,
    pub(in crate::ui) focus: Focus,
    pub(in crate::ui) flipped: bool,
    pub(in crate::ui) glyphs: PieceGlyphs,
    pub(in crate::ui) board_cursor: Square,
    pub(in crate::ui) selected_square: Option<Square>,
    pub(in crate::ui) valid_targets: Vec<Square>,
    pub(in crate::ui) prompt: Option<Prompt>,
    pub(in crate::ui) notice: Option<Notice>,
    pub(in crate::ui) show_logs: bool,
    pub(in crate::ui) logs: LogBuffer,
    pub(in crate::ui) db_pool: SqlitePool,
    pub(in crate::ui) remote: Option<RemoteClient>,
}

impl App {
    pub fn new(logs: LogBuffer, db_pool: SqlitePool, remote: Option<RemoteClient>) -> Self {
        Self {
            session: GameSession::default(),
            files: Vec::new(),
            games: Vec::new(),
            active_path: String::new(),
            active_content: String::new(),
            selected_file: 0,
            selected_game: 0,
            loaded_game: None,
            mode: Mode::Review,
            focus: Focus::Files,
            flipped: false,
            glyphs: PieceGlyphs::Figurine,
            board_cursor: Square::E2,
            selected_square: None,
            valid_targets: Vec::new(),
            prompt: None,
            notice: None,
            show_logs: true,
            logs,
            db_pool,
            remote,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        info!("UI started");
        self.log("UI started");

        super::handlers::FileHandler::new(self).load_startup_state();

        loop {
            terminal.draw(|f| self.draw(f))?;

            let event = event::read()?;
            if let Event::Key(key) = event {
                if super::handlers::InputHandler::new(self).handle_key(key) {
                    return Ok(());
                }
            }
        }
    }

    pub(in crate::ui) fn log(&self, msg: impl Into<String> + Display) {
        tracing::info!("{}", &msg);
        self.logs.push(msg.into());
    }

    /// Shows a notice in the status bar and mirrors it to the log pane.
    pub(in crate::ui) fn notify(&mut self, notice: Notice) {
        self.log(notice.text.clone());
        self.notice = Some(notice);
    }

    /// Execute an async database or sync operation from the event loop.
    pub(in crate::ui) fn run_db_operation<F, T>(&self, future: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
    }
}
