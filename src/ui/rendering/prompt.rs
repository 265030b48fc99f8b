//! Modal prompt drawn over the main layout.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::{app::App, types::PromptKind};

impl App {
    pub(in crate::ui) fn draw_prompt(&self, f: &mut Frame) {
        let Some(prompt) = &self.prompt else {
            return;
        };

        let area = centered_rect(52, 4, f.area());
        f.render_widget(Clear, area);

        let hint = Line::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        ));
        let lines = match prompt.kind {
            PromptKind::DeleteFile => {
                let name = prompt
                    .target
                    .as_ref()
                    .map(|(_, name)| name.as_str())
                    .unwrap_or("?");
                vec![Line::from(format!("Delete \"{name}\"?")), hint]
            }
            _ => vec![Line::from(format!("> {}█", prompt.input)), hint],
        };

        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.kind.title())
                    .border_style(Style::default().fg(Color::Yellow)),
            ),
            area,
        );
    }
}

fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    Rect {
        x: r.x + r.width.saturating_sub(width) / 2,
        y: r.y + r.height.saturating_sub(height) / 2,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}
