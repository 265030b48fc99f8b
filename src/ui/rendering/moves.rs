//! Move list rendering, paired by full move with the cursor ply highlighted.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use shakmaty::Color as PieceColor;

use crate::ui::app::App;

impl App {
    pub(in crate::ui) fn draw_moves(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Moves");

        let history = self.session.history();
        if history.is_empty() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "No moves",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block),
                area,
            );
            return;
        }

        let cursor = self.session.cursor();
        let highlight = Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = Vec::new();
        let mut pair: Vec<Span> = Vec::new();
        let mut move_no = 1u32;
        let mut cursor_line = 0usize;

        for (ply, record) in history.iter().enumerate() {
            if record.color == PieceColor::White && !pair.is_empty() {
                lines.push(Line::from(std::mem::take(&mut pair)));
            }

            let current = cursor == Some(ply);
            if current {
                cursor_line = lines.len();
            }
            let style = if current {
                highlight
            } else {
                Style::default()
            };
            let san = Span::styled(record.san.to_string(), style);

            if record.color == PieceColor::White {
                pair.push(Span::styled(
                    format!("{move_no:>3}. "),
                    Style::default().fg(Color::DarkGray),
                ));
                pair.push(san);
                move_no += 1;
            } else {
                // A game that starts from a position with Black to move
                // opens with a continuation number.
                if pair.is_empty() {
                    pair.push(Span::styled(
                        format!("{move_no:>3}... "),
                        Style::default().fg(Color::DarkGray),
                    ));
                    move_no += 1;
                } else {
                    pair.push(Span::raw("  "));
                }
                pair.push(san);
                lines.push(Line::from(std::mem::take(&mut pair)));
            }
        }
        if !pair.is_empty() {
            lines.push(Line::from(pair));
        }

        if let Some(comment) = self.session.comment_at(self.session.displayed_plies()) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                comment.to_string(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        // Scroll so the cursor line stays visible.
        let height = area.height.saturating_sub(2) as usize;
        let start = if height == 0 {
            0
        } else {
            cursor_line
                .saturating_sub(height / 2)
                .min(lines.len().saturating_sub(height))
        };
        let visible: Vec<Line> = lines.into_iter().skip(start).collect();

        f.render_widget(Paragraph::new(visible).block(block), area);
    }
}
