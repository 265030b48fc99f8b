//! Keyboard input dispatch and the modal prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::db::models::DEFAULT_FILE_PATH;

use super::super::{
    app::App,
    types::{Focus, Mode, Notice, Prompt, PromptKind},
};
use super::{BoardHandler, FileHandler, NavHandler};

/// Helper struct routing key events to the active mode's handler.
pub struct InputHandler<'a> {
    app: &'a mut App,
}

impl<'a> InputHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.app.prompt.is_some() {
            self.handle_prompt_key(key);
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q' | 'Q'), KeyModifiers::CONTROL) => {
                self.app.log("Exit requested");
                return true;
            }

            (KeyCode::Char('l' | 'L'), KeyModifiers::CONTROL) => {
                self.toggle_browse();
            }

            (KeyCode::Char('p' | 'P'), KeyModifiers::CONTROL) => {
                self.toggle_play();
            }

            (KeyCode::Char('n' | 'N'), KeyModifiers::CONTROL) => {
                self.app.prompt = Some(Prompt::new(PromptKind::AddFile));
            }

            (KeyCode::Char('r' | 'R'), KeyModifiers::CONTROL) => {
                self.open_rename_prompt();
            }

            (KeyCode::Char('d' | 'D'), KeyModifiers::CONTROL) => {
                self.open_delete_prompt();
            }

            (KeyCode::Char('o' | 'O'), KeyModifiers::CONTROL) => {
                self.app.prompt = Some(Prompt::new(PromptKind::ImportPath));
            }

            (KeyCode::Char('e' | 'E'), KeyModifiers::CONTROL) => {
                self.app.prompt = Some(Prompt::new(PromptKind::ExportPath));
            }

            (KeyCode::Char('s' | 'S'), KeyModifiers::CONTROL) => {
                FileHandler::new(self.app).save_game();
            }

            (KeyCode::Char('u' | 'U'), KeyModifiers::CONTROL) => {
                FileHandler::new(self.app).pull();
            }

            (KeyCode::Char('g' | 'G'), KeyModifiers::CONTROL) => {
                self.app.show_logs = !self.app.show_logs;
                let status = if self.app.show_logs { "shown" } else { "hidden" };
                self.app.log(format!("Log pane {}", status));
            }

            _ => match self.app.mode {
                Mode::Review => self.handle_review_key(key),
                Mode::Browse => self.handle_browse_key(key),
                Mode::Play => self.handle_play_key(key),
            },
        }
        false
    }

    fn handle_review_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => NavHandler::new(self.app).go_to_previous(),
            KeyCode::Right => NavHandler::new(self.app).go_to_next(),
            KeyCode::Home => NavHandler::new(self.app).go_to_start(),
            KeyCode::End => NavHandler::new(self.app).go_to_end(),
            KeyCode::Char('f' | 'F') => NavHandler::new(self.app).flip_board(),
            KeyCode::Char('c' | 'C') => NavHandler::new(self.app).cycle_pieces(),
            KeyCode::Char('r' | 'R') => NavHandler::new(self.app).reset(),
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.app.focus = match self.app.focus {
                    Focus::Files => Focus::Games,
                    Focus::Games => Focus::Files,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => match self.app.focus {
                Focus::Files => FileHandler::new(self.app).activate_selected(),
                Focus::Games => {
                    let index = self.app.selected_game;
                    FileHandler::new(self.app).load_game(index);
                }
            },
            KeyCode::Esc => self.app.mode = Mode::Review,
            _ => {}
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => BoardHandler::new(self.app).move_cursor(0, 1),
            KeyCode::Down => BoardHandler::new(self.app).move_cursor(0, -1),
            KeyCode::Left => BoardHandler::new(self.app).move_cursor(-1, 0),
            KeyCode::Right => BoardHandler::new(self.app).move_cursor(1, 0),
            KeyCode::Enter => BoardHandler::new(self.app).press(),
            KeyCode::Esc => BoardHandler::new(self.app).clear_selection(),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let (index, len) = match self.app.focus {
            Focus::Files => (&mut self.app.selected_file, self.app.files.len()),
            Focus::Games => (&mut self.app.selected_game, self.app.games.len()),
        };
        if delta < 0 {
            *index = index.saturating_sub(1);
        } else if *index + 1 < len {
            *index += 1;
        }
    }

    fn toggle_browse(&mut self) {
        if self.app.mode == Mode::Browse {
            self.app.mode = Mode::Review;
            self.app.log("Review mode");
        } else {
            self.app.mode = Mode::Browse;
            self.app.focus = Focus::Files;
            self.app.log("Browsing the library");
        }
    }

    fn toggle_play(&mut self) {
        if self.app.mode == Mode::Play {
            self.app.mode = Mode::Review;
            BoardHandler::new(self.app).clear_selection();
            self.app.log("Review mode");
        } else {
            self.app.mode = Mode::Play;
            self.app.log("Play mode, move pieces with the board cursor");
        }
    }

    fn open_rename_prompt(&mut self) {
        let path = self.app.active_path.clone();
        if path == DEFAULT_FILE_PATH {
            self.app
                .notify(Notice::error("The default file cannot be renamed."));
            return;
        }
        let name = FileHandler::new(self.app).active_name();
        self.app.prompt = Some(Prompt::with_target(PromptKind::RenameFile, path, name));
    }

    /// Deletes the highlighted file when the file list has focus, the
    /// active file otherwise.
    fn open_delete_prompt(&mut self) {
        let (path, name) = if self.app.mode == Mode::Browse && self.app.focus == Focus::Files {
            match self.app.files.get(self.app.selected_file) {
                Some(file) => (file.path.clone(), file.name.clone()),
                None => return,
            }
        } else {
            let path = self.app.active_path.clone();
            let name = FileHandler::new(self.app).active_name();
            (path, name)
        };
        if path == DEFAULT_FILE_PATH {
            self.app
                .notify(Notice::error("The default file cannot be deleted."));
            return;
        }
        self.app.prompt = Some(Prompt::with_target(PromptKind::DeleteFile, path, name));
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.app.prompt = None;
            }
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                if let Some(prompt) = self.app.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(prompt) = self.app.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.app.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::AddFile => FileHandler::new(self.app).add_file(&prompt.input),
            PromptKind::RenameFile => {
                if let Some((path, _)) = prompt.target {
                    FileHandler::new(self.app).rename_file(&path, &prompt.input);
                }
            }
            PromptKind::DeleteFile => {
                if let Some((path, name)) = prompt.target {
                    FileHandler::new(self.app).delete_file(&path, &name);
                }
            }
            PromptKind::ImportPath => FileHandler::new(self.app).import(&prompt.input),
            PromptKind::ExportPath => FileHandler::new(self.app).export(&prompt.input),
        }
    }
}
