//! Multi-game PGN splitting.
//!
//! Best-effort segmentation of raw text that may hold several concatenated
//! games. Segments are split on blank lines that immediately precede an
//! `[Event` tag, tag pairs are extracted per segment, and a display label
//! is built for selection lists. This is a heuristic, not a validating
//! parser; segments that do not look like games are dropped with a
//! warning.

use std::collections::HashMap;

use tracing::{info, warn};

/// One game cut out of a larger PGN text.
#[derive(Debug, Clone)]
pub struct GameEntry {
    /// Position of the segment in the input, counting dropped segments.
    pub id: usize,
    /// Full PGN text of this game, trimmed.
    pub pgn: String,
    /// All `[Key "Value"]` pairs found in the segment; later duplicates win.
    pub tags: HashMap<String, String>,
    /// Human-readable label for selection lists.
    pub display_name: String,
}

/// Split raw PGN text into individual games.
pub fn split_games(input: &str) -> Vec<GameEntry> {
    let normalized = input.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let entries: Vec<GameEntry> = segment_boundaries(trimmed)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.starts_with('['))
        .enumerate()
        .filter_map(|(index, segment)| build_entry(index, segment))
        .collect();

    info!(games = entries.len(), "Split PGN text into games");
    entries
}

/// Cut the text on runs of two or more newlines that are followed by an
/// `[Event` tag. A leading segment without one is kept as-is.
fn segment_boundaries(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut seg_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let run_start = i;
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] == b'\n' {
            j += 1;
        }
        if j - run_start >= 2 && starts_event_tag(&text[j..]) {
            pieces.push(&text[seg_start..run_start]);
            seg_start = j;
        }
        i = j;
    }
    pieces.push(&text[seg_start..]);
    pieces
}

fn starts_event_tag(rest: &str) -> bool {
    match rest.strip_prefix("[Event") {
        Some(tail) => tail.chars().next().is_some_and(char::is_whitespace),
        None => false,
    }
}

fn build_entry(index: usize, segment: &str) -> Option<GameEntry> {
    let tags = extract_tags(segment);

    if tags.is_empty() && !movetext_follows_tags(segment) {
        let snippet: String = segment.chars().take(100).collect();
        warn!(%snippet, "Skipping segment that does not look like a game");
        return None;
    }

    let display_name = display_name(&tags, index);
    Some(GameEntry {
        id: index,
        pgn: segment.to_string(),
        tags,
        display_name,
    })
}

/// Scan the whole segment for `[Key "Value"]` pairs.
fn extract_tags(segment: &str) -> HashMap<String, String> {
    let bytes = segment.as_bytes();
    let mut tags = HashMap::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        match parse_tag_at(segment, i) {
            Some((key, value, end)) => {
                tags.insert(key, value);
                i = end;
            }
            None => i += 1,
        }
    }
    tags
}

/// Parse one tag pair starting at the `[` at byte offset `open`.
/// Returns the key, the value, and the offset just past the closing `]`.
fn parse_tag_at(text: &str, open: usize) -> Option<(String, String, usize)> {
    let bytes = text.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let key_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == key_start {
        return None;
    }
    let key_end = i;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'"' {
        return None;
    }
    i += 1;
    let value_start = i;
    while i < bytes.len() && bytes[i] != b'"' {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }
    let value_end = i;
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b']' {
        return None;
    }
    Some((
        text[key_start..key_end].to_string(),
        text[value_start..value_end].to_string(),
        i + 1,
    ))
}

/// A segment with no tags still counts as a game when movetext starts
/// right after the last tag line.
fn movetext_follows_tags(segment: &str) -> bool {
    let tail_start = match segment.rfind("]\n") {
        Some(idx) => idx + 2,
        None => 1.min(segment.len()),
    };
    segment[tail_start..].trim_start().starts_with("1.")
}

fn tag_or<'a>(tags: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    match tags.get(key) {
        Some(value) if !value.is_empty() => value.as_str(),
        _ => default,
    }
}

fn display_name(tags: &HashMap<String, String>, index: usize) -> String {
    let white = tag_or(tags, "White", "Unknown");
    let black = tag_or(tags, "Black", "Unknown");
    let result = tag_or(tags, "Result", "*");
    let event = tag_or(tags, "Event", "Unknown Event");
    let date = tag_or(tags, "Date", "????.??.??");
    let round = match tags.get("Round") {
        Some(r) if !r.is_empty() => format!("Round {r}"),
        _ => String::new(),
    };

    let mut name = format!("{white} vs {black} ({result})");
    if event != "Unknown Event" || !round.is_empty() || date != "????.??.??" {
        let details: Vec<&str> = [event, round.as_str(), date]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        name.push_str(" - ");
        name.push_str(&details.join(", "));
    } else {
        name.push_str(&format!(" - Game {}", index + 1));
    }
    name.trim().to_string()
}
