//! Dispatcher applying `Action` to the editor model.
//!
//! Sub-modules:
//! * `edit`  - text mutation and cursor motion in the text box
//! * `file`  - save and quit, including the unsaved-changes confirmation
//! * `menu`  - menu bar focus, selection and activation
//!
//! A `TextError` escaping `dispatch` means the store rejected an index the
//! model computed itself; the runtime treats it as fatal.

use crate::Action;
use core_model::EditorModel;
use core_text::TextError;

mod edit;
mod file;
mod menu;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// A repaint is needed.
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
}

/// Apply an action to the model.
pub fn dispatch(action: Action, model: &mut EditorModel) -> Result<DispatchResult, TextError> {
    tracing::trace!(target: "actions.dispatch", op = action.name(), "dispatch");
    // Any action other than a repeated quit cancels a pending confirmation.
    let quit_armed = std::mem::take(&mut model.state_mut().quit_armed);

    let result = match action {
        Action::Insert(c) => edit::insert(model, c)?,
        Action::Paste(text) => edit::paste(model, &text)?,
        Action::Backspace => edit::backspace(model),
        Action::Delete => edit::delete(model),
        Action::Motion(kind) => edit::motion(model, kind),
        Action::Save => file::save(model.state_mut()),
        Action::Quit => file::quit(model.state_mut(), quit_armed),
        Action::ForceQuit => DispatchResult::quit(),
        Action::ToggleWrap => menu::toggle_wrap(model),
        Action::FocusText => menu::focus_text(model),
        Action::FocusMenu(hotkey) => menu::focus_menu(model, hotkey),
        Action::MenuMove(delta) => menu::move_selection(model, delta),
        Action::MenuActivate => menu::activate(model),
    };
    Ok(result)
}
