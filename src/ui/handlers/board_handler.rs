//! Play-mode board cursor and move entry.

use shakmaty::{Color, File, Position, Rank, Square};

use crate::game::GameStatus;

use super::super::{app::App, types::Notice};

/// Helper struct for piece selection and interactive moves.
pub struct BoardHandler<'a> {
    app: &'a mut App,
}

impl<'a> BoardHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Moves the board cursor one square in the given screen direction.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let (dx, dy) = if self.app.flipped { (-dx, -dy) } else { (dx, dy) };
        let file = self.app.board_cursor.file() as i32 + dx;
        let rank = self.app.board_cursor.rank() as i32 + dy;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            self.app.board_cursor =
                Square::from_coords(File::new(file as u32), Rank::new(rank as u32));
        }
    }

    /// Selects the cursor square, plays onto it, or clears the selection,
    /// mirroring click handling on a pointer-driven board.
    pub fn press(&mut self) {
        let square = self.app.board_cursor;

        if let Some(selected) = self.app.selected_square {
            if selected == square {
                self.clear_selection();
                return;
            }
            if self.app.valid_targets.contains(&square) {
                self.play(selected, square);
                return;
            }
        }

        self.select(square);
    }

    pub fn clear_selection(&mut self) {
        self.app.selected_square = None;
        self.app.valid_targets.clear();
    }

    /// Only pieces of the side to move are selectable.
    fn select(&mut self, square: Square) {
        self.clear_selection();
        let piece = self.app.session.current().board().piece_at(square);
        if piece.is_some_and(|p| p.color == self.app.session.turn()) {
            self.app.selected_square = Some(square);
            self.app.valid_targets = self.app.session.valid_destinations(square);
        }
    }

    fn play(&mut self, from: Square, to: Square) {
        match self.app.session.play_move(from, to) {
            Ok(san) => {
                self.clear_selection();
                self.app.log(format!("Played {san}"));
                self.announce_status();
            }
            Err(err) => {
                self.clear_selection();
                tracing::warn!("{err}");
            }
        }
    }

    /// Raises a notice for terminal positions. Checkmate is green when the
    /// winner sits at the bottom of the board, red otherwise; the drawn
    /// outcomes are warnings.
    fn announce_status(&mut self) {
        let status = self.app.session.status();
        let notice = match status {
            GameStatus::Checkmate { winner } => {
                let at_bottom = if self.app.flipped {
                    Color::Black
                } else {
                    Color::White
                };
                if winner == at_bottom {
                    Notice::success(status.to_string())
                } else {
                    Notice::error(status.to_string())
                }
            }
            GameStatus::Stalemate | GameStatus::Repetition | GameStatus::Draw => {
                Notice::warning(status.to_string())
            }
            GameStatus::Ongoing => return,
        };
        self.app.notify(notice);
    }
}
