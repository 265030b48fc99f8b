//! Log panel rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::app::App;

impl App {
    pub(in crate::ui) fn draw_logs(&self, f: &mut Frame, area: Rect) {
        let logs = self.logs.lines();

        // Show the newest lines that fit inside the borders.
        let height = area.height.saturating_sub(2) as usize;
        let start = logs.len().saturating_sub(height);

        let lines: Vec<Line> = logs[start..]
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect();

        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Logs (Ctrl+G)"),
            ),
            area,
        );
    }
}
