use chrono::{DateTime, Utc};

/// Path of the file seeded on first run. It can never be renamed or
/// deleted.
pub const DEFAULT_FILE_PATH: &str = "/games.pgn";

/// Display name of the seeded default file.
pub const DEFAULT_FILE_NAME: &str = "games.pgn";

/// Bundled game for the default file: Anderssen vs Dufresne, Berlin 1852.
pub const SAMPLE_GAME: &str = r#"[Event "Casual Game"]
[Site "Berlin GER"]
[Date "1852.??.??"]
[Round "?"]
[White "Adolf Anderssen"]
[Black "Jean Dufresne"]
[Result "1-0"]
[ECO "C52"]
[PlyCount "47"]

1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5 4.b4 Bxb4 5.c3 Ba5 6.d4 exd4 7.O-O
d3 8.Qb3 Qf6 9.e5 Qg6 10.Re1 Nge7 11.Ba3 b5 12.Qxb5 Rb8 13.Qa4
Bb6 14.Nbd2 Bb7 15.Ne4 Qf5 16.Bxd3 Qh5 17.Nf6+ gxf6 18.exf6
Rg8 19.Rad1 Qxf3 20.Rxe7+ Nxe7 21.Qxd7+ Kxd7 22.Bf5+ Ke8
23.Bd7+ Kf8 24.Bxe7# 1-0
"#;

/// A named PGN file in the library.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: String,
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

impl StoredFile {
    /// File name without its extension, for the header line.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }
}
