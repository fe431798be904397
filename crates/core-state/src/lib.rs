//! Editor state: the document store plus file metadata.
//!
//! `EditorState` is buffer-centric. Scroll offsets, focus and the menu live in
//! `core-model::EditorModel`, which owns one `EditorState`. Ephemeral status
//! messages are kept here but painted by `core-render::status`.
//!
//! Line endings are reported, never rewritten: a CRLF file keeps its `'\r'`
//! characters in the store and is saved byte for byte.

use core_text::TextStore;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name shown for a document with neither a file name nor any text.
pub const UNTITLED: &str = "Untitled";

/// Maximum length, in chars, of a temporary title.
pub const TEMPORARY_TITLE_MAX: usize = 32;

/// Line ending style of the document, shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    Lf,
    #[default]
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Status bar label.
    pub fn label(self) -> &'static str {
        match self {
            LineEnding::Lf => "Unix (LF)",
            LineEnding::Crlf => "Windows (CRLF)",
        }
    }

    /// Parse a config value (`"lf"` / `"crlf"`, any case).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lf" => Some(LineEnding::Lf),
            "crlf" => Some(LineEnding::Crlf),
            _ => None,
        }
    }
}

/// Majority line ending of `input`; `None` when it has no line breaks.
/// A tie between CRLF and bare LF resolves to CRLF.
pub fn detect_line_ending(input: &str) -> Option<LineEnding> {
    let bytes = input.as_bytes();
    let mut crlf = 0usize;
    let mut lf = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' {
            if i > 0 && bytes[i - 1] == b'\r' {
                crlf += 1;
            } else {
                lf += 1;
            }
        }
    }
    match (crlf, lf) {
        (0, 0) => None,
        (c, l) if c >= l => Some(LineEnding::Crlf),
        _ => Some(LineEnding::Lf),
    }
}

/// Title for a document without a file name: its first non-blank line,
/// trimmed and cut to [`TEMPORARY_TITLE_MAX`] chars.
pub fn temporary_title(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(TEMPORARY_TITLE_MAX).collect())
}

/// Per-document presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub line_ending: LineEnding,
    pub encoding: String,
    pub word_wrap: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Crlf,
            encoding: "UTF-8".to_string(),
            word_wrap: true,
        }
    }
}

/// Status message that disappears after a fixed time.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Top-level document state.
#[derive(Debug)]
pub struct EditorState {
    pub store: TextStore,
    pub file_name: Option<PathBuf>,
    pub dirty: bool,
    pub options: Options,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub ephemeral_ttl: Duration,
    /// Set after a quit request was refused because of unsaved changes; a
    /// second request while set exits.
    pub quit_armed: bool,
}

impl EditorState {
    pub fn new(store: TextStore, options: Options) -> Self {
        Self {
            store,
            file_name: None,
            dirty: false,
            options,
            ephemeral_status: None,
            ephemeral_ttl: Duration::from_millis(3000),
            quit_armed: false,
        }
    }

    /// Bind the document to `path` (used by open and save).
    pub fn set_file_name(&mut self, path: impl AsRef<Path>) {
        self.file_name = Some(path.as_ref().to_path_buf());
    }

    /// Name used in the title bar: the file's base name, else a temporary
    /// title derived from the content, else [`UNTITLED`].
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .file_name
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
        {
            return name;
        }
        temporary_title(&self.store.text()).unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Whether the title should carry the modified marker. An unnamed document
    /// with no text is never shown as modified.
    pub fn shows_modified(&self) -> bool {
        if !self.dirty {
            return false;
        }
        self.file_name.is_some() || self.store.chars().any(|c| !c.is_whitespace())
    }

    /// Replace the content with `text` (cursor at the start) and adopt its
    /// line ending if it has one.
    pub fn load_text(&mut self, text: &str) {
        self.store.clear();
        self.store.append(text);
        self.store.move_index(0);
        if let Some(ending) = detect_line_ending(text) {
            self.options.line_ending = ending;
        }
        self.dirty = false;
    }

    /// Show `msg` in the status bar for the configured TTL.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S) {
        let ttl = self.ephemeral_ttl;
        self.set_ephemeral_for(msg, ttl);
    }

    pub fn set_ephemeral_for<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Clear an expired message; returns true if one was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn ephemeral_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(TextStore::new(), Options::default())
    }
}
