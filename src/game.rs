//! Game session: verbose move history, replay-based navigation, and
//! interactive play on top of the shakmaty rules engine.
//!
//! A session owns the record of one loaded game. The move list is built
//! once per load and never mutated afterwards; every navigation request
//! replays the recorded moves from the initial position, so the displayed
//! board is always exactly what the engine produces for that line.

use std::fmt;
use std::fmt::Write as _;
use std::io::Cursor;
use std::ops::ControlFlow;

use pgn_reader::{KnownOutcome, Outcome, RawComment, RawTag, Reader, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position, Role, Square};
use thiserror::Error;
use tracing::{debug, error, info};

/// FEN of the standard chess starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const MOVETEXT_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid PGN: {0}")]
    InvalidPgn(String),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("move index {index} out of range for {len} recorded moves")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("already at the boundary of the game")]
    AtBoundary,
    #[error("recorded history failed to replay at ply {ply} ({san})")]
    Replay { ply: usize, san: String },
}

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("no legal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },
}

/// One played move with its surrounding positions. Created at load time,
/// never mutated. For castling, `from`/`to` are the king's squares.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub san: SanPlus,
    pub fen_before: String,
    pub fen_after: String,
}

/// Terminal-state classification of the displayed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Checkmate { winner: Color },
    Stalemate,
    Repetition,
    Draw,
    Ongoing,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Checkmate { winner: Color::White } => write!(f, "Checkmate, White wins"),
            GameStatus::Checkmate { winner: Color::Black } => write!(f, "Checkmate, Black wins"),
            GameStatus::Stalemate => write!(f, "Stalemate"),
            GameStatus::Repetition => write!(f, "Draw by threefold repetition"),
            GameStatus::Draw => write!(f, "Draw"),
            GameStatus::Ongoing => write!(f, "In progress"),
        }
    }
}

/// A loaded game plus the cursor into its move history.
///
/// The cursor is `None` before any move (the initial position) and
/// `Some(i)` for the position after move `i`. Only navigation operations
/// move it; interactive play changes the live position but never the
/// recorded history.
pub struct GameSession {
    initial: Chess,
    initial_fen: String,
    history: Vec<MoveRecord>,
    headers: Vec<(String, String)>,
    comments: Vec<(usize, String)>,
    result: String,
    cursor: Option<usize>,
    current: Chess,
    /// Repetition keys of every position reached on the displayed line,
    /// starting with the initial position.
    trail: Vec<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_initial(Chess::default())
    }
}

impl GameSession {
    /// Fresh session from the standard start, or from a FEN when given.
    pub fn new(fen: Option<&str>) -> Result<Self, LoadError> {
        let initial = match fen {
            Some(text) => {
                let parsed: Fen = text
                    .parse()
                    .map_err(|e| LoadError::InvalidFen(format!("{e}")))?;
                parsed
                    .into_position(CastlingMode::Standard)
                    .map_err(|e| LoadError::InvalidFen(format!("{e}")))?
            }
            None => Chess::default(),
        };
        Ok(Self::from_initial(initial))
    }

    fn from_initial(initial: Chess) -> Self {
        let initial_fen = position_fen(&initial);
        let trail = vec![repetition_key(&initial_fen)];
        GameSession {
            current: initial.clone(),
            initial,
            initial_fen,
            history: Vec::new(),
            headers: Vec::new(),
            comments: Vec::new(),
            result: "*".to_string(),
            cursor: None,
            trail,
        }
    }

    /// Load a game from PGN text, replacing all previous state.
    ///
    /// On any failure the session is left exactly as it was.
    pub fn load(&mut self, pgn: &str) -> Result<(), LoadError> {
        if pgn.trim().is_empty() {
            return Err(LoadError::InvalidPgn("empty input".to_string()));
        }

        let mut loader = GameLoader::default();
        let mut reader = Reader::new(Cursor::new(pgn));
        match reader.read_game(&mut loader) {
            Ok(Some(())) => {}
            Ok(None) => return Err(LoadError::InvalidPgn("no game found".to_string())),
            Err(e) => return Err(LoadError::InvalidPgn(e.to_string())),
        }
        if let Some(msg) = loader.error {
            return Err(LoadError::InvalidPgn(msg));
        }
        if loader.records.is_empty() && loader.headers.is_empty() {
            return Err(LoadError::InvalidPgn("no tags or moves found".to_string()));
        }

        let result = loader
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("Result"))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| outcome_token(loader.outcome.as_ref()).to_string());

        self.initial_fen = position_fen(&loader.initial);
        self.current = loader.initial.clone();
        self.initial = loader.initial;
        self.history = loader.records;
        self.headers = loader.headers;
        self.comments = loader.comments;
        self.result = result;
        self.cursor = None;
        self.trail = vec![repetition_key(&self.initial_fen)];

        info!(moves = self.history.len(), "Loaded game");
        Ok(())
    }

    /// Re-initialize to the standard starting position with no moves.
    pub fn reset(&mut self) {
        *self = GameSession::default();
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Move record at `index`, in play order.
    pub fn get(&self, index: usize) -> Result<&MoveRecord, NavError> {
        self.history.get(index).ok_or(NavError::IndexOutOfRange {
            index,
            len: self.history.len(),
        })
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Header value by key, matched case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Comment attached to the position after `plies` moves, if any.
    pub fn comment_at(&self, plies: usize) -> Option<&str> {
        self.comments
            .iter()
            .find(|(p, _)| *p == plies)
            .map(|(_, text)| text.as_str())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of plies between the initial position and the displayed one.
    pub fn displayed_plies(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }

    pub fn current(&self) -> &Chess {
        &self.current
    }

    pub fn current_fen(&self) -> String {
        position_fen(&self.current)
    }

    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }

    pub fn turn(&self) -> Color {
        self.current.turn()
    }

    /// Cursor to before the first move.
    pub fn go_to_start(&mut self) -> Result<&Chess, NavError> {
        self.go_to_index(None)
    }

    /// Cursor to after the last move; same as `go_to_start` when the
    /// history is empty.
    pub fn go_to_end(&mut self) -> Result<&Chess, NavError> {
        match self.history.len().checked_sub(1) {
            Some(last) => self.go_to_index(Some(last)),
            None => self.go_to_index(None),
        }
    }

    /// Step one ply back; `AtBoundary` at the initial position.
    pub fn go_to_previous(&mut self) -> Result<&Chess, NavError> {
        match self.cursor {
            None => Err(NavError::AtBoundary),
            Some(0) => self.go_to_index(None),
            Some(i) => self.go_to_index(Some(i - 1)),
        }
    }

    /// Step one ply forward; `AtBoundary` after the last move.
    pub fn go_to_next(&mut self) -> Result<&Chess, NavError> {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.history.len() {
            return Err(NavError::AtBoundary);
        }
        self.go_to_index(Some(next))
    }

    /// Jump to an arbitrary cursor value; `None` is the initial position.
    ///
    /// The cursor and displayed position change only when the replay
    /// succeeds.
    pub fn go_to_index(&mut self, target: Option<usize>) -> Result<&Chess, NavError> {
        if let Some(index) = target {
            if index >= self.history.len() {
                return Err(NavError::IndexOutOfRange {
                    index,
                    len: self.history.len(),
                });
            }
        }
        let (position, trail) = self.replay_to(target)?;
        self.cursor = target;
        self.current = position;
        self.trail = trail;
        debug!(cursor = ?self.cursor, "Navigated");
        Ok(&self.current)
    }

    /// Replay recorded moves 0..=target from the initial position.
    fn replay_to(&self, target: Option<usize>) -> Result<(Chess, Vec<String>), NavError> {
        let mut position = self.initial.clone();
        let mut trail = Vec::with_capacity(self.history.len() + 1);
        trail.push(repetition_key(&self.initial_fen));

        if let Some(last) = target {
            for (ply, record) in self.history[..=last].iter().enumerate() {
                let m = match record.san.san.to_move(&position) {
                    Ok(m) => m,
                    Err(_) => {
                        error!(ply, san = %record.san, "Recorded history failed to replay");
                        return Err(NavError::Replay {
                            ply,
                            san: record.san.to_string(),
                        });
                    }
                };
                position.play_unchecked(m);
                trail.push(repetition_key(&position_fen(&position)));
            }
        }
        Ok((position, trail))
    }

    /// Play a move on the displayed position.
    ///
    /// Matches `from`/`to` against the legal moves; a promotion is
    /// resolved to a queen. Advances the live position but leaves the
    /// recorded history and cursor untouched.
    pub fn play_move(&mut self, from: Square, to: Square) -> Result<SanPlus, PlayError> {
        let mut queening = None;
        let mut chosen = None;
        for m in self.current.legal_moves() {
            if let UciMove::Normal {
                from: f,
                to: t,
                promotion,
            } = UciMove::from_standard(m)
            {
                if f != from || t != to {
                    continue;
                }
                match promotion {
                    None => {
                        chosen = Some(m);
                        break;
                    }
                    Some(Role::Queen) => queening = Some(m),
                    Some(_) => {}
                }
            }
        }
        let m = chosen
            .or(queening)
            .ok_or(PlayError::IllegalMove { from, to })?;

        let san = SanPlus::from_move_and_play_unchecked(&mut self.current, m);
        self.trail.push(repetition_key(&self.current_fen()));
        info!(%san, "Played move");
        Ok(san)
    }

    /// Destination squares of the legal moves from `from`; castling is
    /// reported as the king's destination.
    pub fn valid_destinations(&self, from: Square) -> Vec<Square> {
        let mut dests = Vec::new();
        for m in self.current.legal_moves() {
            if let UciMove::Normal { from: f, to, .. } = UciMove::from_standard(m) {
                if f == from && !dests.contains(&to) {
                    dests.push(to);
                }
            }
        }
        dests
    }

    /// Terminal-state check of the displayed position. Checkmate wins
    /// over stalemate, which wins over repetition and the draw rules.
    pub fn status(&self) -> GameStatus {
        if self.current.is_checkmate() {
            return GameStatus::Checkmate {
                winner: !self.current.turn(),
            };
        }
        if self.current.is_stalemate() {
            return GameStatus::Stalemate;
        }
        if self.is_threefold() {
            return GameStatus::Repetition;
        }
        if self.current.halfmoves() >= 100
            || (self.current.has_insufficient_material(Color::White)
                && self.current.has_insufficient_material(Color::Black))
        {
            return GameStatus::Draw;
        }
        GameStatus::Ongoing
    }

    fn is_threefold(&self) -> bool {
        match self.trail.last() {
            Some(last) => self.trail.iter().filter(|key| *key == last).count() >= 3,
            None => false,
        }
    }

    /// Serialize the recorded game back to PGN. The output loads again
    /// through [`GameSession::load`].
    pub fn to_pgn(&self) -> String {
        const ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

        let mut out = String::new();
        for key in ROSTER {
            let value = match self.header(key) {
                Some(v) => v,
                None => match key {
                    "Date" => "????.??.??",
                    "Result" => self.result.as_str(),
                    _ => "?",
                },
            };
            let _ = writeln!(out, "[{key} \"{value}\"]");
        }
        for (key, value) in &self.headers {
            if ROSTER.iter().any(|r| r.eq_ignore_ascii_case(key)) {
                continue;
            }
            let _ = writeln!(out, "[{key} \"{value}\"]");
        }
        if self.header("FEN").is_none() && self.initial_fen != STARTING_FEN {
            let _ = writeln!(out, "[SetUp \"1\"]");
            let _ = writeln!(out, "[FEN \"{}\"]", self.initial_fen);
        }
        out.push('\n');

        let mut tokens = Vec::with_capacity(self.history.len() + 1);
        let mut move_no = self.initial.fullmoves().get();
        for (ply, record) in self.history.iter().enumerate() {
            match record.color {
                Color::White => tokens.push(format!("{}. {}", move_no, record.san)),
                Color::Black => {
                    if ply == 0 {
                        tokens.push(format!("{}... {}", move_no, record.san));
                    } else {
                        tokens.push(record.san.to_string());
                    }
                    move_no += 1;
                }
            }
        }
        tokens.push(self.result.clone());
        out.push_str(&wrap_tokens(&tokens, MOVETEXT_WIDTH));
        out.push('\n');
        out
    }
}

/// FEN string of a position, with the en-passant square only when a
/// legal capture exists.
fn position_fen(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// First four FEN fields: placement, side to move, castling, en passant.
/// Positions with equal keys count as repetitions.
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn outcome_token(outcome: Option<&Outcome>) -> &'static str {
    match outcome {
        Some(Outcome::Known(KnownOutcome::Decisive {
            winner: Color::White,
        })) => "1-0",
        Some(Outcome::Known(KnownOutcome::Decisive {
            winner: Color::Black,
        })) => "0-1",
        Some(Outcome::Known(KnownOutcome::Draw)) => "1/2-1/2",
        _ => "*",
    }
}

fn wrap_tokens(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len == 0 {
            out.push_str(token);
            line_len = token.len();
        } else if line_len + 1 + token.len() > width {
            out.push('\n');
            out.push_str(token);
            line_len = token.len();
        } else {
            out.push(' ');
            out.push_str(token);
            line_len += 1 + token.len();
        }
    }
    out
}

/// Visitor that builds the verbose move list for one game, applying each
/// SAN through the engine as it goes. Variations are skipped; the first
/// parse or legality failure poisons the whole game.
#[derive(Default)]
struct GameLoader {
    position: Chess,
    initial: Chess,
    headers: Vec<(String, String)>,
    records: Vec<MoveRecord>,
    comments: Vec<(usize, String)>,
    outcome: Option<Outcome>,
    error: Option<String>,
}

impl Visitor for GameLoader {
    type Tags = Vec<(String, String)>;
    type Movetext = ();
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Vec::with_capacity(10))
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let key = String::from_utf8_lossy(key).into_owned();
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        tags.push((key, value));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        self.headers = tags;

        // Castling mode from the Variant header, case-insensitive.
        let castling_mode = self
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("Variant"))
            .and_then(|(_, v)| {
                if v.eq_ignore_ascii_case("chess960") {
                    Some(CastlingMode::Chess960)
                } else {
                    None
                }
            })
            .unwrap_or(CastlingMode::Standard);

        let fen_header = self
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("FEN"))
            .map(|(_, v)| v.as_str());

        if let Some(fen_str) = fen_header {
            match fen_str.parse::<Fen>() {
                Ok(fen) => match fen.into_position(castling_mode) {
                    Ok(position) => self.initial = position,
                    Err(e) => self.error = Some(format!("invalid FEN position: {e}")),
                },
                Err(e) => self.error = Some(format!("failed to parse FEN: {e}")),
            }
        }
        self.position = self.initial.clone();
        ControlFlow::Continue(())
    }

    fn san(&mut self, _movetext: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if self.error.is_some() {
            return ControlFlow::Continue(());
        }
        let m = match san_plus.san.to_move(&self.position) {
            Ok(m) => m,
            Err(e) => {
                self.error = Some(format!("illegal move {san_plus}: {e}"));
                return ControlFlow::Continue(());
            }
        };
        let (from, to) = match UciMove::from_standard(m) {
            UciMove::Normal { from, to, .. } => (from, to),
            other => {
                self.error = Some(format!("unexpected move form: {other}"));
                return ControlFlow::Continue(());
            }
        };
        let color = self.position.turn();
        let fen_before = position_fen(&self.position);
        self.position.play_unchecked(m);
        let fen_after = position_fen(&self.position);
        self.records.push(MoveRecord {
            color,
            from,
            to,
            san: san_plus,
            fen_before,
            fen_after,
        });
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        _movetext: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes()).trim().to_string();
        if !text.is_empty() {
            self.comments.push((self.records.len(), text));
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _movetext: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn outcome(&mut self, _movetext: &mut Self::Movetext, outcome: Outcome) -> ControlFlow<Self::Output> {
        self.outcome = Some(outcome);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, _movetext: Self::Movetext) -> Self::Output {}
}
