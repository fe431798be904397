//! Configuration loading and parsing.
//!
//! Reads `oxpad.toml` (or an override path supplied by the binary). Every key
//! is optional and unknown keys are ignored. A missing or unparsable file
//! yields the defaults.
//!
//! ```toml
//! [view]
//! word_wrap = true
//!
//! [file]
//! line_ending = "crlf"   # or "lf"; used for new documents
//! encoding = "UTF-8"     # status bar label
//!
//! [scroll.margin]
//! vertical = 0
//!
//! [status]
//! message_ms = 3000
//! ```
//!
//! The vertical margin is clamped against the current text height by
//! `Config::apply_context`; the raw value is retained so a resize can re-clamp.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "oxpad.toml";

/// Rows taken by the title, menu and status bars and their rules.
pub const CHROME_ROWS: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub chrome_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, chrome_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            chrome_rows,
        }
    }

    /// Context for a terminal of the given size with the standard bars.
    pub fn from_terminal(columns: u16, rows: u16) -> Self {
        Self::new(columns, rows, CHROME_ROWS)
    }

    pub fn text_rows(&self) -> u16 {
        self.viewport_rows.saturating_sub(self.chrome_rows)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_word_wrap")]
    pub word_wrap: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            word_wrap: Self::default_word_wrap(),
        }
    }
}

impl ViewConfig {
    const fn default_word_wrap() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default = "FileConfig::default_line_ending")]
    pub line_ending: String,
    #[serde(default = "FileConfig::default_encoding")]
    pub encoding: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            line_ending: Self::default_line_ending(),
            encoding: Self::default_encoding(),
        }
    }
}

impl FileConfig {
    fn default_line_ending() -> String {
        "crlf".to_string()
    }

    fn default_encoding() -> String {
        "UTF-8".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: u16,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    #[serde(default = "StatusConfig::default_message_ms")]
    pub message_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            message_ms: Self::default_message_ms(),
        }
    }
}

impl StatusConfig {
    const fn default_message_ms() -> u64 {
        3000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub file: FileConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Original file contents, when one was read.
    pub raw: Option<String>,
    pub file: ConfigFile,
    /// Vertical margin after clamping to the text height.
    pub effective_vertical_margin: u16,
}

/// Config path: `./oxpad.toml` when present, else the platform config dir
/// (`<config_dir>/oxpad/oxpad.toml`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxpad").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_not_found_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                effective_vertical_margin: 0,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp the vertical margin to `(text_rows - 2) / 2` (0 for tiny
    /// regions) and return the effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.scroll.margin.vertical;
        let text_rows = ctx.text_rows();
        let (clamped, max) = if text_rows <= 3 {
            (0, 0)
        } else {
            let max = text_rows.saturating_sub(2) / 2;
            (raw.min(max), max)
        };
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                viewport_rows = ctx.viewport_rows,
                "scroll_margin_vertical_clamped"
            );
        }
        self.effective_vertical_margin = clamped;
        clamped
    }

    /// Re-clamp after a resize. `Some(new_margin)` when the value changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_vertical_margin;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    /// How long ephemeral status messages stay visible.
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.file.status.message_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    fn ctx_with_text_rows(rows: u16) -> ConfigContext {
        ConfigContext::new(80, rows, 0)
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert!(cfg.file.view.word_wrap);
        assert_eq!(cfg.file.file.line_ending, "crlf");
        assert_eq!(cfg.file.file.encoding, "UTF-8");
        assert_eq!(cfg.file.scroll.margin.vertical, 0);
        assert_eq!(cfg.message_ttl(), Duration::from_millis(3000));
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[view]\nword_wrap = false\n[file]\nline_ending = \"lf\"\nencoding = \"Latin-1\"\n\
             [scroll.margin]\nvertical = 3\n[status]\nmessage_ms = 500\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(!cfg.file.view.word_wrap);
        assert_eq!(cfg.file.file.line_ending, "lf");
        assert_eq!(cfg.file.file.encoding, "Latin-1");
        assert_eq!(cfg.file.scroll.margin.vertical, 3);
        assert_eq!(cfg.message_ttl(), Duration::from_millis(500));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[file]\nline_ending = \"lf\"\nunknown = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.file.line_ending, "lf");
        assert_eq!(cfg.file.file.encoding, "UTF-8");
        assert!(cfg.file.view.word_wrap);
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = write_config("[view\nword_wrap = maybe");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn clamps_when_value_exceeds_half_minus_one() {
        let tmp = write_config("[scroll.margin]\nvertical = 50\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.apply_context(ctx_with_text_rows(20)), 9);
        assert_eq!(cfg.effective_vertical_margin, 9);
        assert_eq!(cfg.apply_context(ctx_with_text_rows(3)), 0);
    }

    #[test]
    fn recompute_reports_changes_only() {
        let tmp = write_config("[scroll.margin]\nvertical = 10\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        cfg.apply_context(ctx_with_text_rows(50));
        assert_eq!(cfg.effective_vertical_margin, 10);
        assert_eq!(cfg.recompute_with_context(ctx_with_text_rows(10)), Some(4));
        assert_eq!(cfg.recompute_with_context(ctx_with_text_rows(11)), None);
    }

    #[test]
    fn terminal_context_subtracts_chrome() {
        let ctx = ConfigContext::from_terminal(80, 24);
        assert_eq!(ctx.text_rows(), 18);
        assert_eq!(ConfigContext::from_terminal(80, 4).text_rows(), 0);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[scroll.margin]\nvertical = 8\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            // 12 rows minus chrome leaves 6 text rows -> max = 2
            cfg.apply_context(ConfigContext::from_terminal(80, 12));
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("scroll_margin_vertical_clamped"));
        assert_eq!(cfg.effective_vertical_margin, 2);
    }
}
