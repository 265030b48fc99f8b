use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::{
    app::App,
    types::{Mode, NoticeKind},
};

impl App {
    pub(in crate::ui) fn draw_status(&self, f: &mut Frame, area: Rect) {
        let mode = match self.mode {
            Mode::Review => "Review",
            Mode::Browse => "Browse",
            Mode::Play => "Play",
        };
        let active = self
            .files
            .iter()
            .find(|file| file.path == self.active_path)
            .map(|file| file.stem().to_string())
            .unwrap_or_else(|| "none".to_string());

        let mut spans = vec![Span::raw(format!(
            "{mode} | {active} | Move {}/{} | {}",
            self.session.displayed_plies(),
            self.session.len(),
            self.session.status()
        ))];

        match &self.notice {
            Some(notice) => {
                let color = match notice.kind {
                    NoticeKind::Info => Color::White,
                    NoticeKind::Success => Color::Green,
                    NoticeKind::Warning => Color::Yellow,
                    NoticeKind::Error => Color::Red,
                };
                spans.push(Span::raw(" | "));
                spans.push(Span::styled(
                    notice.text.clone(),
                    Style::default().fg(color),
                ));
            }
            None => {
                spans.push(Span::styled(
                    " | Ctrl+L: Library | Ctrl+P: Play | Ctrl+S: Save | Ctrl+Q: Quit",
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        f.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title("Status")),
            area,
        );
    }
}
