mod board;
mod headers;
mod library;
mod logs;
mod moves;
mod prompt;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::ui::app::App;

impl App {
    pub(in crate::ui) fn draw(&self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(12),   // Main content
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(28), // Library sidebar
                Constraint::Length(32), // Board
                Constraint::Min(30),    // Headers, moves, logs
            ])
            .split(outer[0]);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        self.draw_files(f, sidebar[0]);
        self.draw_games(f, sidebar[1]);

        self.draw_board(f, columns[1]);

        let right = if self.show_logs {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(7), // Game headers
                    Constraint::Min(6),    // Move list
                    Constraint::Length(8), // Log panel
                ])
                .split(columns[2])
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(6)])
                .split(columns[2])
        };

        self.draw_headers(f, right[0]);
        self.draw_moves(f, right[1]);
        if self.show_logs {
            self.draw_logs(f, right[2]);
        }

        self.draw_status(f, outer[1]);

        // The prompt is modal and covers whatever is underneath it.
        if self.prompt.is_some() {
            self.draw_prompt(f);
        }
    }
}
