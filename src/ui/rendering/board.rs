//! Chessboard rendering with selection and last-move highlights.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use shakmaty::{Color as PieceColor, File, Piece, Position, Rank, Role, Square};

use crate::ui::{
    app::App,
    types::{Mode, PieceGlyphs},
};

const LIGHT_SQUARE: Color = Color::Rgb(240, 217, 181);
const DARK_SQUARE: Color = Color::Rgb(181, 136, 99);
const CURSOR_SQUARE: Color = Color::Rgb(218, 195, 74);
const SELECTED_SQUARE: Color = Color::Rgb(116, 169, 87);
const TARGET_SQUARE: Color = Color::Rgb(120, 142, 173);
const LAST_MOVE_SQUARE: Color = Color::Rgb(170, 162, 88);

impl App {
    pub(in crate::ui) fn draw_board(&self, f: &mut Frame, area: Rect) {
        let board = self.session.current().board();

        // Only highlight the cursor move while reviewing; in play mode the
        // selection flow already marks the squares that matter.
        let last_move = if self.mode == Mode::Review {
            self.session
                .cursor()
                .and_then(|i| self.session.get(i).ok())
                .map(|record| (record.from, record.to))
        } else {
            None
        };

        let ranks: Vec<u32> = if self.flipped {
            (0..8).collect()
        } else {
            (0..8).rev().collect()
        };
        let files: Vec<u32> = if self.flipped {
            (0..8).rev().collect()
        } else {
            (0..8).collect()
        };

        let mut lines: Vec<Line> = Vec::with_capacity(9);
        for rank in &ranks {
            let mut spans: Vec<Span> = Vec::with_capacity(9);
            spans.push(Span::raw(format!("{} ", rank + 1)));
            for file in &files {
                let square = Square::from_coords(File::new(*file), Rank::new(*rank));
                let piece = board.piece_at(square);
                let fg = match piece.map(|p| p.color) {
                    Some(PieceColor::White) => Color::White,
                    Some(PieceColor::Black) => Color::Black,
                    None => Color::DarkGray,
                };
                let content = match piece {
                    Some(p) => format!(" {} ", glyph(p, self.glyphs)),
                    None => "   ".to_string(),
                };
                spans.push(Span::styled(
                    content,
                    Style::default().fg(fg).bg(self.square_bg(square, last_move)),
                ));
            }
            lines.push(Line::from(spans));
        }

        let mut labels = String::from("  ");
        for file in &files {
            labels.push(' ');
            labels.push((b'a' + *file as u8) as char);
            labels.push(' ');
        }
        lines.push(Line::from(Span::styled(
            labels,
            Style::default().fg(Color::DarkGray),
        )));

        let title = if self.flipped {
            "Board (black)"
        } else {
            "Board (white)"
        };
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }

    fn square_bg(&self, square: Square, last_move: Option<(Square, Square)>) -> Color {
        if self.mode == Mode::Play && square == self.board_cursor {
            return CURSOR_SQUARE;
        }
        if self.selected_square == Some(square) {
            return SELECTED_SQUARE;
        }
        if self.valid_targets.contains(&square) {
            return TARGET_SQUARE;
        }
        if last_move.is_some_and(|(from, to)| square == from || square == to) {
            return LAST_MOVE_SQUARE;
        }
        if (square.file() as u32 + square.rank() as u32) % 2 == 1 {
            LIGHT_SQUARE
        } else {
            DARK_SQUARE
        }
    }
}

fn glyph(piece: Piece, set: PieceGlyphs) -> char {
    match set {
        PieceGlyphs::Figurine => match (piece.color, piece.role) {
            (PieceColor::White, Role::King) => '♔',
            (PieceColor::White, Role::Queen) => '♕',
            (PieceColor::White, Role::Rook) => '♖',
            (PieceColor::White, Role::Bishop) => '♗',
            (PieceColor::White, Role::Knight) => '♘',
            (PieceColor::White, Role::Pawn) => '♙',
            (PieceColor::Black, Role::King) => '♚',
            (PieceColor::Black, Role::Queen) => '♛',
            (PieceColor::Black, Role::Rook) => '♜',
            (PieceColor::Black, Role::Bishop) => '♝',
            (PieceColor::Black, Role::Knight) => '♞',
            (PieceColor::Black, Role::Pawn) => '♟',
        },
        // Solid glyphs render more evenly in terminals that give the
        // outlined set a different width; color carries the side.
        PieceGlyphs::Solid => match piece.role {
            Role::King => '♚',
            Role::Queen => '♛',
            Role::Rook => '♜',
            Role::Bishop => '♝',
            Role::Knight => '♞',
            Role::Pawn => '♟',
        },
        PieceGlyphs::Ascii => piece.char(),
    }
}
