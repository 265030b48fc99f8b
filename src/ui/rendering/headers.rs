use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::app::App;

impl App {
    pub(in crate::ui) fn draw_headers(&self, f: &mut Frame, area: Rect) {
        let value = |key: &str| self.session.header(key).unwrap_or("N/A").to_string();
        let label = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled("White:  ", label),
                Span::raw(value("White")),
            ]),
            Line::from(vec![
                Span::styled("Black:  ", label),
                Span::raw(value("Black")),
            ]),
            Line::from(vec![
                Span::styled("Result: ", label),
                Span::raw(value("Result")),
            ]),
            Line::from(vec![
                Span::styled("Event:  ", label),
                Span::raw(value("Event")),
            ]),
            Line::from(vec![
                Span::styled("Date:   ", label),
                Span::raw(value("Date")),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Game")),
            area,
        );
    }
}
