//! Library file operations: selection, add/rename/delete, import/export,
//! saving, and remote sync.

use anyhow::Result;
use tracing::{info, warn};

use crate::{db::files, pgn, sync::RemoteClient};

use super::super::{
    app::App,
    types::{Mode, Notice},
};

/// Helper struct for everything that touches the file library.
pub struct FileHandler<'a> {
    app: &'a mut App,
}

impl<'a> FileHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Initial load when the UI starts: file list, active file, first game.
    pub fn load_startup_state(&mut self) {
        if let Err(err) = self.refresh_files() {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        self.load_active_content();
    }

    fn refresh_files(&mut self) -> Result<()> {
        let files = self
            .app
            .run_db_operation(files::list_files(&self.app.db_pool))?;
        let active = self
            .app
            .run_db_operation(files::active_file(&self.app.db_pool))?;
        self.app.files = files;
        self.app.active_path = active;
        if self.app.selected_file >= self.app.files.len() {
            self.app.selected_file = self.app.files.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Re-reads the active file, re-splits its games, and loads the first
    /// one. An empty file leaves the current session in place.
    pub fn load_active_content(&mut self) {
        let content = match self.app.run_db_operation(files::get_content(
            &self.app.db_pool,
            &self.app.active_path,
        )) {
            Ok(content) => content.unwrap_or_default(),
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Database error: {err}")));
                return;
            }
        };

        self.app.active_content = content;
        self.app.games = pgn::split_games(&self.app.active_content);
        self.app.selected_game = 0;
        self.app.loaded_game = None;

        if !self.app.games.is_empty() {
            self.load_game(0);
        }
    }

    /// Loads the game at `index` of the split list into the session.
    pub fn load_game(&mut self, index: usize) {
        let Some(entry) = self.app.games.get(index) else {
            return;
        };
        let pgn_text = entry.pgn.clone();
        let display = entry.display_name.clone();

        match self.app.session.load(&pgn_text) {
            Ok(()) => {
                self.app.loaded_game = Some(index);
                self.app.mode = Mode::Review;
                self.app.selected_square = None;
                self.app.valid_targets.clear();
                self.app.notify(Notice::success(format!("Loaded {display}")));
            }
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Could not load game: {err}")));
            }
        }
    }

    /// Makes the selected file active. Selecting the already active file
    /// does nothing.
    pub fn activate_selected(&mut self) {
        let Some(file) = self.app.files.get(self.app.selected_file) else {
            return;
        };
        let (path, name) = (file.path.clone(), file.name.clone());
        if path == self.app.active_path {
            return;
        }

        if let Err(err) = self
            .app
            .run_db_operation(files::set_active_file(&self.app.db_pool, &path))
        {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        self.app.active_path = path;
        self.load_active_content();
        self.app.log(format!("Switched active file to {name}"));
    }

    /// Creates a new empty library file. When sync is configured the
    /// remote copy is created first and a failed upload aborts the add.
    pub fn add_file(&mut self, raw: &str) {
        let Some((name, path)) = files::normalize_file_name(raw) else {
            self.app.notify(Notice::error("File name cannot be empty."));
            return;
        };
        match self
            .app
            .run_db_operation(files::file_exists(&self.app.db_pool, &path))
        {
            Ok(true) => {
                self.app
                    .notify(Notice::error(format!("File \"{name}\" already exists.")));
                return;
            }
            Ok(false) => {}
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Database error: {err}")));
                return;
            }
        }

        if let Some(remote) = self.remote() {
            let created = self.app.run_db_operation(async {
                remote.upload(&path, "").await?;
                Ok(())
            });
            if let Err(err) = created {
                self.app.notify(Notice::error(format!(
                    "Failed to add file \"{name}\": {err}"
                )));
                return;
            }
        }

        let result = self.app.run_db_operation(async {
            files::add_file(&self.app.db_pool, &path, &name, "").await?;
            files::set_active_file(&self.app.db_pool, &path).await
        });
        match result {
            Ok(()) => {
                self.app.active_path = path;
                if let Err(err) = self.refresh_files() {
                    self.app
                        .notify(Notice::error(format!("Database error: {err}")));
                    return;
                }
                self.load_active_content();
                self.app
                    .notify(Notice::success(format!("File \"{name}\" created.")));
            }
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Database error: {err}")));
            }
        }
    }

    /// Renames a library file locally, then tells the sync server. A
    /// failed remote rename degrades to a warning.
    pub fn rename_file(&mut self, old_path: &str, raw: &str) {
        let Some((new_name, new_path)) = files::normalize_file_name(raw) else {
            self.app
                .notify(Notice::error("New file name cannot be empty."));
            return;
        };
        if new_path.eq_ignore_ascii_case(old_path) {
            return;
        }
        match self
            .app
            .run_db_operation(files::file_exists(&self.app.db_pool, &new_path))
        {
            Ok(true) => {
                self.app.notify(Notice::error(format!(
                    "A file named \"{new_name}\" already exists."
                )));
                return;
            }
            Ok(false) => {}
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Database error: {err}")));
                return;
            }
        }

        if let Err(err) = self.app.run_db_operation(files::rename_file(
            &self.app.db_pool,
            old_path,
            &new_path,
            &new_name,
        )) {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        if let Err(err) = self.refresh_files() {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        self.app
            .notify(Notice::success(format!("File renamed to \"{new_name}\".")));

        if let Some(remote) = self.remote() {
            let renamed = self.app.run_db_operation(async {
                remote.rename(old_path, &new_path).await?;
                Ok(())
            });
            if let Err(err) = renamed {
                warn!("Remote rename failed: {err}");
                self.app.notify(Notice::warning(format!(
                    "Note: could not rename the file on the sync server. Local file is now \"{new_name}\"."
                )));
            }
        }
    }

    /// Deletes a library file. The remote delete is attempted first but
    /// never blocks the local removal.
    pub fn delete_file(&mut self, path: &str, name: &str) {
        let mut remote_failed = false;
        if let Some(remote) = self.remote() {
            let deleted = self.app.run_db_operation(async {
                remote.delete(path).await?;
                Ok(())
            });
            if let Err(err) = deleted {
                warn!("Remote delete failed: {err}");
                remote_failed = true;
            }
        }

        if let Err(err) = self
            .app
            .run_db_operation(files::remove_file(&self.app.db_pool, path))
        {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        if let Err(err) = self.refresh_files() {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }
        self.load_active_content();
        self.app
            .notify(Notice::success(format!("File \"{name}\" removed.")));
        if remote_failed {
            self.app.notify(Notice::warning(format!(
                "Note: could not remove \"{name}\" from the sync server."
            )));
        }
    }

    /// Reads a PGN from the filesystem into the library and activates it.
    /// An existing file with the same name is overwritten.
    pub fn import(&mut self, raw_path: &str) {
        let fs_path = std::path::PathBuf::from(raw_path.trim());
        let content = match std::fs::read_to_string(&fs_path) {
            Ok(content) => content,
            Err(err) => {
                self.app.notify(Notice::error(format!(
                    "Could not read {}: {err}",
                    fs_path.display()
                )));
                return;
            }
        };
        let raw_name = fs_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let Some((name, path)) = files::normalize_file_name(raw_name) else {
            self.app.notify(Notice::error("File name cannot be empty."));
            return;
        };

        let result = self.app.run_db_operation(async {
            if files::file_exists(&self.app.db_pool, &path).await? {
                files::set_content(&self.app.db_pool, &path, &content).await?;
            } else {
                files::add_file(&self.app.db_pool, &path, &name, &content).await?;
            }
            files::set_active_file(&self.app.db_pool, &path).await
        });
        match result {
            Ok(()) => {
                self.app.active_path = path.clone();
                if let Err(err) = self.refresh_files() {
                    self.app
                        .notify(Notice::error(format!("Database error: {err}")));
                    return;
                }
                self.load_active_content();
                self.app
                    .notify(Notice::success(format!("Imported \"{name}\".")));
                self.push_remote(&path, &content, &name);
            }
            Err(err) => {
                self.app
                    .notify(Notice::error(format!("Database error: {err}")));
            }
        }
    }

    /// Writes the active file's content to a filesystem path.
    pub fn export(&mut self, raw_path: &str) {
        let trimmed = raw_path.trim();
        if trimmed.is_empty() {
            self.app.notify(Notice::error("Export path cannot be empty."));
            return;
        }
        let fs_path = std::path::PathBuf::from(trimmed);
        let name = self.active_name();
        match std::fs::write(&fs_path, &self.app.active_content) {
            Ok(()) => {
                self.app.notify(Notice::success(format!(
                    "Exported \"{name}\" to {}",
                    fs_path.display()
                )));
            }
            Err(err) => {
                self.app.notify(Notice::error(format!(
                    "Could not write {}: {err}",
                    fs_path.display()
                )));
            }
        }
    }

    /// Serializes the session into the active file, replacing the segment
    /// the game was loaded from or appending a new one, then pushes the
    /// file to the sync server.
    pub fn save_game(&mut self) {
        let serialized = self.app.session.to_pgn();

        let content = match self.app.loaded_game {
            Some(index) if index < self.app.games.len() => {
                let mut parts: Vec<String> = self
                    .app
                    .games
                    .iter()
                    .map(|g| g.pgn.trim().to_string())
                    .collect();
                parts[index] = serialized.trim().to_string();
                parts.join("\n\n") + "\n"
            }
            _ => {
                let existing = self.app.active_content.trim();
                if existing.is_empty() {
                    serialized
                } else {
                    format!("{existing}\n\n{}", serialized.trim_start())
                }
            }
        };

        if let Err(err) = self.app.run_db_operation(files::set_content(
            &self.app.db_pool,
            &self.app.active_path,
            &content,
        )) {
            self.app
                .notify(Notice::error(format!("Database error: {err}")));
            return;
        }

        let previous = self.app.loaded_game;
        self.app.active_content = content;
        self.app.games = pgn::split_games(&self.app.active_content);
        self.app.loaded_game = match previous {
            Some(index) if index < self.app.games.len() => Some(index),
            _ => self.app.games.len().checked_sub(1),
        };
        if self.app.selected_game >= self.app.games.len() {
            self.app.selected_game = self.app.games.len().saturating_sub(1);
        }

        let name = self.active_name();
        info!("Saved game into {}", self.app.active_path);
        self.app
            .notify(Notice::success(format!("Game saved to \"{name}\".")));

        let path = self.app.active_path.clone();
        let content = self.app.active_content.clone();
        self.push_remote(&path, &content, &name);
    }

    /// Replaces local content with the remote copy when the two differ.
    pub fn pull(&mut self) {
        let Some(remote) = self.remote() else {
            self.app.notify(Notice::info("Sync is not configured."));
            return;
        };
        let name = self.active_name();
        let path = self.app.active_path.clone();

        let fetched = self
            .app
            .run_db_operation(async { Ok(remote.download(&path).await?) });
        match fetched {
            Ok(None) => {
                self.app
                    .notify(Notice::info(format!("No remote copy of \"{name}\".")));
            }
            Ok(Some(content)) if content == self.app.active_content => {
                self.app
                    .notify(Notice::info(format!("\"{name}\" is already up to date.")));
            }
            Ok(Some(content)) => {
                if let Err(err) = self.app.run_db_operation(files::set_content(
                    &self.app.db_pool,
                    &path,
                    &content,
                )) {
                    self.app
                        .notify(Notice::error(format!("Database error: {err}")));
                    return;
                }
                self.load_active_content();
                self.app.notify(Notice::success(format!(
                    "Pulled \"{name}\" from the sync server."
                )));
            }
            Err(err) => {
                self.app.notify(Notice::error(format!("Sync failed: {err}")));
            }
        }
    }

    pub fn active_name(&self) -> String {
        self.app
            .files
            .iter()
            .find(|f| f.path == self.app.active_path)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| self.app.active_path.clone())
    }

    fn remote(&self) -> Option<RemoteClient> {
        self.app.remote.clone()
    }

    fn push_remote(&mut self, path: &str, content: &str, name: &str) {
        let Some(remote) = self.remote() else {
            return;
        };
        let pushed = self.app.run_db_operation(async {
            remote.upload(path, content).await?;
            Ok(())
        });
        if let Err(err) = pushed {
            warn!("Remote upload failed: {err}");
            self.app.notify(Notice::warning(format!(
                "Note: could not push \"{name}\" to the sync server."
            )));
        }
    }
}
