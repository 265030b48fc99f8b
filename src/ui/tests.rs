//! UI module tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shakmaty::{Color, Square};
use tempfile::TempDir;

use super::{
    app::App,
    handlers::{BoardHandler, FileHandler, InputHandler, NavHandler},
    types::{Focus, LogBuffer, Mode, NoticeKind, PieceGlyphs, PromptKind},
};
use crate::db::models::DEFAULT_FILE_PATH;
use crate::game::STARTING_FEN;

/// Helper function to create a test app backed by a seeded throwaway
/// database. The returned TempDir must outlive the app.
async fn create_test_app() -> (App, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = crate::db::create_pool(&dir.path().join("library.db"))
        .await
        .unwrap();
    crate::db::files::ensure_seed(&pool).await.unwrap();
    (App::new(LogBuffer::new(), pool, None), dir)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn notice_text(app: &App) -> String {
    app.notice
        .as_ref()
        .map(|n| n.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod app_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_app_initialization() {
        let (app, _dir) = create_test_app().await;

        assert_eq!(app.mode, Mode::Review);
        assert_eq!(app.focus, Focus::Files);
        assert!(app.session.is_empty());
        assert!(app.loaded_game.is_none());
        assert!(app.prompt.is_none());
        assert!(app.notice.is_none());
        assert!(app.show_logs);
        assert!(!app.flipped);
        assert_eq!(app.glyphs, PieceGlyphs::Figurine);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_startup_loads_seed_library() {
        let (mut app, _dir) = create_test_app().await;

        FileHandler::new(&mut app).load_startup_state();

        assert_eq!(app.files.len(), 1);
        assert_eq!(app.files[0].path, DEFAULT_FILE_PATH);
        assert_eq!(app.active_path, DEFAULT_FILE_PATH);
        assert_eq!(app.games.len(), 1);
        assert_eq!(app.loaded_game, Some(0));
        assert_eq!(app.session.len(), 47);
        assert_eq!(app.session.cursor(), None);
        assert!(notice_text(&app).starts_with("Loaded Adolf Anderssen"));
    }

    #[test]
    fn test_log_buffer() {
        let logs = LogBuffer::new();

        logs.push("Test message 1".to_string());
        logs.push("Test message 2".to_string());

        let lines = logs.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Test message 1");
        assert_eq!(lines[1], "Test message 2");
    }

    #[test]
    fn test_log_buffer_max_capacity() {
        let logs = LogBuffer::new();

        // Push more than MAX_LOG_LINES
        for i in 0..350 {
            logs.push(format!("Message {}", i));
        }

        let lines = logs.lines();
        assert!(lines.len() <= super::super::types::MAX_LOG_LINES);
        assert_eq!(lines.last().map(String::as_str), Some("Message 349"));
    }
}

#[cfg(test)]
mod nav_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_arrow_keys_step_through_game() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(key(KeyCode::Right));
        assert_eq!(app.session.cursor(), Some(0));

        InputHandler::new(&mut app).handle_key(key(KeyCode::Right));
        assert_eq!(app.session.cursor(), Some(1));

        InputHandler::new(&mut app).handle_key(key(KeyCode::Left));
        assert_eq!(app.session.cursor(), Some(0));

        InputHandler::new(&mut app).handle_key(key(KeyCode::Left));
        assert_eq!(app.session.cursor(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_home_and_end_jump() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(key(KeyCode::End));
        assert_eq!(app.session.cursor(), Some(46));

        InputHandler::new(&mut app).handle_key(key(KeyCode::Home));
        assert_eq!(app.session.cursor(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stepping_past_boundaries_is_harmless() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        // Already at the start
        InputHandler::new(&mut app).handle_key(key(KeyCode::Left));
        assert_eq!(app.session.cursor(), None);

        InputHandler::new(&mut app).handle_key(key(KeyCode::End));
        InputHandler::new(&mut app).handle_key(key(KeyCode::Right));
        assert_eq!(app.session.cursor(), Some(46));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reset_drops_the_loaded_game() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(key(KeyCode::Char('r')));

        assert!(app.session.is_empty());
        assert_eq!(app.session.current_fen(), STARTING_FEN);
        assert!(app.loaded_game.is_none());
        assert_eq!(notice_text(&app), "Game reset to starting position.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_flip_clears_selection() {
        let (mut app, _dir) = create_test_app().await;
        app.selected_square = Some(Square::E2);
        app.valid_targets = vec![Square::E4];

        InputHandler::new(&mut app).handle_key(key(KeyCode::Char('f')));

        assert!(app.flipped);
        assert!(app.selected_square.is_none());
        assert!(app.valid_targets.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cycle_pieces_wraps_around() {
        let (mut app, _dir) = create_test_app().await;

        InputHandler::new(&mut app).handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.glyphs, PieceGlyphs::Solid);
        InputHandler::new(&mut app).handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.glyphs, PieceGlyphs::Ascii);
        InputHandler::new(&mut app).handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.glyphs, PieceGlyphs::Figurine);
    }
}

#[cfg(test)]
mod play_tests {
    use super::*;

    fn press_at(app: &mut App, square: Square) {
        app.board_cursor = square;
        BoardHandler::new(app).press();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_play_mode_toggle() {
        let (mut app, _dir) = create_test_app().await;

        InputHandler::new(&mut app).handle_key(ctrl('p'));
        assert_eq!(app.mode, Mode::Play);

        InputHandler::new(&mut app).handle_key(ctrl('p'));
        assert_eq!(app.mode, Mode::Review);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cursor_movement_stays_on_board() {
        let (mut app, _dir) = create_test_app().await;
        assert_eq!(app.board_cursor, Square::E2);

        for _ in 0..8 {
            BoardHandler::new(&mut app).move_cursor(-1, 0);
        }
        assert_eq!(app.board_cursor, Square::A2);

        for _ in 0..9 {
            BoardHandler::new(&mut app).move_cursor(0, 1);
        }
        assert_eq!(app.board_cursor, Square::A8);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cursor_movement_inverts_when_flipped() {
        let (mut app, _dir) = create_test_app().await;
        app.board_cursor = Square::E4;
        app.flipped = true;

        BoardHandler::new(&mut app).move_cursor(1, 0);
        assert_eq!(app.board_cursor, Square::D4);

        BoardHandler::new(&mut app).move_cursor(0, 1);
        assert_eq!(app.board_cursor, Square::D3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_select_own_piece_shows_targets() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();

        press_at(&mut app, Square::E2);

        assert_eq!(app.selected_square, Some(Square::E2));
        assert!(app.valid_targets.contains(&Square::E3));
        assert!(app.valid_targets.contains(&Square::E4));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_opponent_piece_is_not_selectable() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();

        press_at(&mut app, Square::E7);

        assert!(app.selected_square.is_none());
        assert!(app.valid_targets.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pressing_selected_square_deselects() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();

        press_at(&mut app, Square::E2);
        press_at(&mut app, Square::E2);

        assert!(app.selected_square.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_playing_a_move_advances_the_position() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();

        press_at(&mut app, Square::E2);
        press_at(&mut app, Square::E4);

        assert!(app.selected_square.is_none());
        assert_eq!(app.session.turn(), Color::Black);
        assert_ne!(app.session.current_fen(), STARTING_FEN);
        // Interactive play never touches the recorded history.
        assert!(app.session.is_empty());
        assert_eq!(app.session.cursor(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_checkmate_against_bottom_side_is_an_error_notice() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();

        // Fool's mate: Black wins while White sits at the bottom.
        for (from, to) in [
            (Square::F2, Square::F3),
            (Square::E7, Square::E5),
            (Square::G2, Square::G4),
            (Square::D8, Square::H4),
        ] {
            press_at(&mut app, from);
            press_at(&mut app, to);
        }

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.text, "Checkmate, Black wins");
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_checkmate_for_bottom_side_is_a_success_notice() {
        let (mut app, _dir) = create_test_app().await;
        NavHandler::new(&mut app).reset();
        app.flipped = true;

        for (from, to) in [
            (Square::F2, Square::F3),
            (Square::E7, Square::E5),
            (Square::G2, Square::G4),
            (Square::D8, Square::H4),
        ] {
            press_at(&mut app, from);
            press_at(&mut app, to);
        }

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.text, "Checkmate, Black wins");
        assert_eq!(notice.kind, NoticeKind::Success);
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_file_creates_and_activates() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).add_file("openings");

        assert_eq!(app.files.len(), 2);
        assert_eq!(app.active_path, "/openings.pgn");
        assert!(app.games.is_empty());
        assert_eq!(notice_text(&app), "File \"openings.pgn\" created.");
        // The empty file leaves the previously loaded game on the board.
        assert_eq!(app.session.len(), 47);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_duplicate_file_is_rejected() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).add_file("games");

        assert_eq!(app.files.len(), 1);
        assert_eq!(notice_text(&app), "File \"games.pgn\" already exists.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_blank_name_is_rejected() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).add_file("   ");

        assert_eq!(app.files.len(), 1);
        assert_eq!(notice_text(&app), "File name cannot be empty.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rename_file_updates_the_list() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        FileHandler::new(&mut app).add_file("draft");

        FileHandler::new(&mut app).rename_file("/draft.pgn", "final");

        assert!(app.files.iter().any(|f| f.path == "/final.pgn"));
        assert!(!app.files.iter().any(|f| f.path == "/draft.pgn"));
        assert_eq!(app.active_path, "/final.pgn");
        assert_eq!(notice_text(&app), "File renamed to \"final.pgn\".");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rename_to_existing_name_is_rejected() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        FileHandler::new(&mut app).add_file("draft");

        FileHandler::new(&mut app).rename_file("/draft.pgn", "games");

        assert!(app.files.iter().any(|f| f.path == "/draft.pgn"));
        assert_eq!(
            notice_text(&app),
            "A file named \"games.pgn\" already exists."
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_active_file_falls_back_to_default() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        FileHandler::new(&mut app).add_file("extra");

        InputHandler::new(&mut app).handle_key(ctrl('d'));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::DeleteFile);
        InputHandler::new(&mut app).handle_key(key(KeyCode::Enter));

        assert!(app.prompt.is_none());
        assert_eq!(app.files.len(), 1);
        assert_eq!(app.active_path, DEFAULT_FILE_PATH);
        assert_eq!(app.loaded_game, Some(0));
        assert_eq!(notice_text(&app), "File \"extra.pgn\" removed.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_default_file_cannot_be_renamed_or_deleted() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(ctrl('r'));
        assert!(app.prompt.is_none());
        assert_eq!(notice_text(&app), "The default file cannot be renamed.");

        InputHandler::new(&mut app).handle_key(ctrl('d'));
        assert!(app.prompt.is_none());
        assert_eq!(notice_text(&app), "The default file cannot be deleted.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_activate_selected_switches_files() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        FileHandler::new(&mut app).add_file("empty");
        assert_eq!(app.active_path, "/empty.pgn");

        let default_index = app
            .files
            .iter()
            .position(|f| f.path == DEFAULT_FILE_PATH)
            .unwrap();
        app.selected_file = default_index;
        FileHandler::new(&mut app).activate_selected();

        assert_eq!(app.active_path, DEFAULT_FILE_PATH);
        assert_eq!(app.games.len(), 1);
        assert_eq!(app.loaded_game, Some(0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_import_reads_a_pgn_from_disk() {
        let (mut app, dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        let source = dir.path().join("two.pgn");
        let sample = crate::db::models::SAMPLE_GAME;
        std::fs::write(&source, format!("{sample}\n\n{sample}")).unwrap();

        FileHandler::new(&mut app).import(source.to_str().unwrap());

        assert_eq!(app.files.len(), 2);
        assert_eq!(app.active_path, "/two.pgn");
        assert_eq!(app.games.len(), 2);
        assert_eq!(app.loaded_game, Some(0));
        assert_eq!(notice_text(&app), "Imported \"two.pgn\".");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_import_missing_path_reports_an_error() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).import("/no/such/file.pgn");

        assert_eq!(app.files.len(), 1);
        assert!(notice_text(&app).starts_with("Could not read"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_writes_the_active_content() {
        let (mut app, dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        let target = dir.path().join("out.pgn");
        FileHandler::new(&mut app).export(target.to_str().unwrap());

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, app.active_content);
        assert!(notice_text(&app).starts_with("Exported \"games.pgn\""));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_game_rewrites_the_loaded_segment() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).save_game();

        assert_eq!(app.games.len(), 1);
        assert_eq!(app.loaded_game, Some(0));
        assert!(app.active_content.contains("[White \"Adolf Anderssen\"]"));
        assert!(app.active_content.contains("Bxe7#"));
        assert_eq!(notice_text(&app), "Game saved to \"games.pgn\".");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_game_appends_when_nothing_is_loaded() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        NavHandler::new(&mut app).reset();

        FileHandler::new(&mut app).save_game();

        assert_eq!(app.games.len(), 2);
        assert_eq!(app.loaded_game, Some(1));
        assert_eq!(notice_text(&app), "Game saved to \"games.pgn\".");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pull_without_remote_is_a_notice() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        FileHandler::new(&mut app).pull();

        assert_eq!(notice_text(&app), "Sync is not configured.");
    }
}

#[cfg(test)]
mod prompt_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_prompt_collects_typed_input() {
        let (mut app, _dir) = create_test_app().await;

        InputHandler::new(&mut app).handle_key(ctrl('n'));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::AddFile);

        for c in ['t', 'e', 's', 't'] {
            InputHandler::new(&mut app).handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.prompt.as_ref().unwrap().input, "test");

        InputHandler::new(&mut app).handle_key(key(KeyCode::Backspace));
        assert_eq!(app.prompt.as_ref().unwrap().input, "tes");

        InputHandler::new(&mut app).handle_key(key(KeyCode::Esc));
        assert!(app.prompt.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_prompt_submit_creates_the_file() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(ctrl('n'));
        for c in ['t', 'e', 's', 't'] {
            InputHandler::new(&mut app).handle_key(key(KeyCode::Char(c)));
        }
        InputHandler::new(&mut app).handle_key(key(KeyCode::Enter));

        assert!(app.prompt.is_none());
        assert_eq!(app.files.len(), 2);
        assert_eq!(app.active_path, "/test.pgn");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rename_prompt_targets_the_active_file() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();
        FileHandler::new(&mut app).add_file("draft");

        InputHandler::new(&mut app).handle_key(ctrl('r'));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::RenameFile);
        assert_eq!(
            prompt.target,
            Some(("/draft.pgn".to_string(), "draft.pgn".to_string()))
        );

        for c in ['f', 'i', 'n', 'a', 'l'] {
            InputHandler::new(&mut app).handle_key(key(KeyCode::Char(c)));
        }
        InputHandler::new(&mut app).handle_key(key(KeyCode::Enter));

        assert_eq!(app.active_path, "/final.pgn");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ctrl_q_requests_exit() {
        let (mut app, _dir) = create_test_app().await;
        assert!(InputHandler::new(&mut app).handle_key(ctrl('q')));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_browse_mode_focus_and_exit() {
        let (mut app, _dir) = create_test_app().await;
        FileHandler::new(&mut app).load_startup_state();

        InputHandler::new(&mut app).handle_key(ctrl('l'));
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.focus, Focus::Files);

        InputHandler::new(&mut app).handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Games);

        // Single game, so the selection cannot move.
        InputHandler::new(&mut app).handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_game, 0);
        InputHandler::new(&mut app).handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_game, 0);

        InputHandler::new(&mut app).handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Review);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ctrl_g_toggles_the_log_pane() {
        let (mut app, _dir) = create_test_app().await;
        assert!(app.show_logs);

        InputHandler::new(&mut app).handle_key(ctrl('g'));
        assert!(!app.show_logs);

        InputHandler::new(&mut app).handle_key(ctrl('g'));
        assert!(app.show_logs);
    }
}
