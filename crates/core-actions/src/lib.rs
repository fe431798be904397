//! Editor actions: key translation, dispatch and file IO.
//!
//! Input flows `KeyEvent -> KeyTranslator -> Action -> dispatch`, and the
//! dispatcher is the only place that mutates the `EditorModel` in response to
//! user input.

mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::{OpenFileResult, WriteFileResult, open_file, write_file};
pub use key_translator::KeyTranslator;

/// Cursor movement within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Insert one char at the cursor (Enter and Tab arrive as `'\n'` / `'\t'`).
    Insert(char),
    /// Bracketed paste.
    Paste(String),
    Backspace,
    Delete,
    Motion(MotionKind),
    Save,
    /// Close request; refused once while the document has unsaved changes.
    Quit,
    /// Exit regardless of unsaved changes (Ctrl-C).
    ForceQuit,
    ToggleWrap,
    FocusText,
    /// Focus the menu bar, selecting the button with this hotkey if any.
    FocusMenu(char),
    MenuMove(isize),
    MenuActivate,
}

impl Action {
    /// Short stable name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Insert(_) => "insert",
            Action::Paste(_) => "paste",
            Action::Backspace => "backspace",
            Action::Delete => "delete",
            Action::Motion(_) => "motion",
            Action::Save => "save",
            Action::Quit => "quit",
            Action::ForceQuit => "force_quit",
            Action::ToggleWrap => "toggle_wrap",
            Action::FocusText => "focus_text",
            Action::FocusMenu(_) => "focus_menu",
            Action::MenuMove(_) => "menu_move",
            Action::MenuActivate => "menu_activate",
        }
    }
}
