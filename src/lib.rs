//! Rookery is a terminal PGN library and game viewer.
//!
//! Games live in a local SQLite library as PGN files, optionally mirrored
//! to a remote sync server. The [`game`] module replays and plays games,
//! [`pgn`] splits multi-game files, and [`ui`] renders everything with
//! ratatui.

pub mod args;
pub mod config;
pub mod db;
pub mod game;
pub mod pgn;
pub mod sync;
pub mod ui;
