//! Sidebar panels for the file library and the games in the active file.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::{
    app::App,
    types::{Focus, Mode},
};

impl App {
    pub(in crate::ui) fn draw_files(&self, f: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Browse && self.focus == Focus::Files;
        let lines: Vec<Line> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let marker = if file.path == self.active_path {
                    "● "
                } else {
                    "  "
                };
                let mut style = Style::default();
                if file.path == self.active_path {
                    style = style.fg(Color::Green);
                }
                if focused && i == self.selected_file {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                Line::from(Span::styled(format!("{marker}{}", file.name), style))
            })
            .collect();

        f.render_widget(
            Paragraph::new(window(lines, self.selected_file, area)).block(
                panel_block("Files", focused),
            ),
            area,
        );
    }

    pub(in crate::ui) fn draw_games(&self, f: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Browse && self.focus == Focus::Games;
        let lines: Vec<Line> = if self.games.is_empty() {
            vec![Line::from(Span::styled(
                "No games",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.games
                .iter()
                .enumerate()
                .map(|(i, game)| {
                    let marker = if self.loaded_game == Some(i) {
                        "● "
                    } else {
                        "  "
                    };
                    let mut style = Style::default();
                    if self.loaded_game == Some(i) {
                        style = style.fg(Color::Green);
                    }
                    if focused && i == self.selected_game {
                        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                    }
                    Line::from(Span::styled(
                        format!("{marker}{}", game.display_name),
                        style,
                    ))
                })
                .collect()
        };

        f.render_widget(
            Paragraph::new(window(lines, self.selected_game, area)).block(
                panel_block("Games", focused),
            ),
            area,
        );
    }
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

/// Trims a list so the selected row stays inside the drawable area.
fn window(lines: Vec<Line<'_>>, selected: usize, area: Rect) -> Vec<Line<'_>> {
    let height = area.height.saturating_sub(2) as usize;
    if height == 0 || lines.len() <= height {
        return lines;
    }
    let start = (selected + 1)
        .saturating_sub(height)
        .min(lines.len() - height);
    lines.into_iter().skip(start).collect()
}
