//! Review-mode navigation through the loaded game.

use tracing::debug;

use crate::game::NavError;

use super::super::{app::App, types::Notice};

/// Helper struct for stepping the session cursor and display toggles.
pub struct NavHandler<'a> {
    app: &'a mut App,
}

impl<'a> NavHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn go_to_start(&mut self) {
        match self.app.session.go_to_start() {
            Ok(_) => debug!("Moved to the initial position"),
            Err(err) => self.report(err),
        }
    }

    pub fn go_to_end(&mut self) {
        match self.app.session.go_to_end() {
            Ok(_) => debug!("Moved to the final position"),
            Err(err) => self.report(err),
        }
    }

    pub fn go_to_previous(&mut self) {
        match self.app.session.go_to_previous() {
            Ok(_) => debug!("Moved back, cursor {:?}", self.app.session.cursor()),
            Err(NavError::AtBoundary) => debug!("Already at the start of the game"),
            Err(err) => self.report(err),
        }
    }

    pub fn go_to_next(&mut self) {
        match self.app.session.go_to_next() {
            Ok(_) => debug!("Moved forward, cursor {:?}", self.app.session.cursor()),
            Err(NavError::AtBoundary) => debug!("Already at the end of the game"),
            Err(err) => self.report(err),
        }
    }

    pub fn go_to_ply(&mut self, index: usize) {
        match self.app.session.go_to_index(Some(index)) {
            Ok(_) => debug!("Jumped to ply {index}"),
            Err(err) => self.report(err),
        }
    }

    /// Drops the loaded game and returns to the standard starting position.
    pub fn reset(&mut self) {
        self.app.session.reset();
        self.app.loaded_game = None;
        self.app.selected_square = None;
        self.app.valid_targets.clear();
        self.app
            .notify(Notice::success("Game reset to starting position."));
    }

    pub fn flip_board(&mut self) {
        self.app.flipped = !self.app.flipped;
        self.app.selected_square = None;
        self.app.valid_targets.clear();
        let side = if self.app.flipped { "Black" } else { "White" };
        self.app.log(format!("Board flipped, {side} at the bottom"));
    }

    pub fn cycle_pieces(&mut self) {
        self.app.glyphs = self.app.glyphs.cycle();
        self.app.log(format!("Piece glyphs: {:?}", self.app.glyphs));
    }

    /// History and engine disagreed during replay. Not user-recoverable.
    fn report(&mut self, err: NavError) {
        tracing::error!("{err}");
        self.app.notify(Notice::error(err.to_string()));
    }
}
