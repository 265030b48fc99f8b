use std::sync::{Arc, Mutex};

pub const MAX_LOG_LINES: usize = 300;

/// Thread-safe circular log buffer with a maximum capacity.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, msg: String) {
        let mut buf = self.inner.lock().unwrap();
        buf.push(msg);
        if buf.len() > MAX_LOG_LINES {
            buf.remove(0);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Application operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stepping through a loaded game.
    Review,
    /// Choosing a library file or one of its games.
    Browse,
    /// Moving pieces on the board.
    Play,
}

/// Which library list has keyboard focus in Browse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Files,
    Games,
}

/// Severity of a status-line notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message shown in the status bar until replaced.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Warning,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// What an open modal prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddFile,
    RenameFile,
    DeleteFile,
    ImportPath,
    ExportPath,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::AddFile => "New file name",
            PromptKind::RenameFile => "Rename file to",
            PromptKind::DeleteFile => "Delete file",
            PromptKind::ImportPath => "Import PGN from path",
            PromptKind::ExportPath => "Export active file to path",
        }
    }
}

/// Modal text prompt state. `target` is the library file a rename or
/// delete acts on.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    pub target: Option<(String, String)>,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            target: None,
        }
    }

    /// A prompt acting on a specific file, given its `(path, name)`.
    pub fn with_target(kind: PromptKind, path: String, name: String) -> Self {
        Self {
            kind,
            input: String::new(),
            target: Some((path, name)),
        }
    }
}

/// Which glyphs the board renders pieces with. `Figurine` uses hollow
/// glyphs for White, `Solid` relies on foreground color alone, `Ascii`
/// is for terminals without chess glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceGlyphs {
    Figurine,
    Solid,
    Ascii,
}

impl PieceGlyphs {
    pub fn cycle(self) -> Self {
        match self {
            PieceGlyphs::Figurine => PieceGlyphs::Solid,
            PieceGlyphs::Solid => PieceGlyphs::Ascii,
            PieceGlyphs::Ascii => PieceGlyphs::Figurine,
        }
    }
}
