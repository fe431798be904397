//! Menu bar focus, selection and activation.

use super::{DispatchResult, file};
use core_model::{EditorModel, Focus, MenuItem};

pub(super) fn focus_text(model: &mut EditorModel) -> DispatchResult {
    if model.focus() == Focus::Text {
        return DispatchResult::clean();
    }
    model.focus_text();
    DispatchResult::dirty()
}

pub(super) fn focus_menu(model: &mut EditorModel, hotkey: char) -> DispatchResult {
    model.focus_menu(Some(hotkey));
    DispatchResult::dirty()
}

pub(super) fn move_selection(model: &mut EditorModel, delta: isize) -> DispatchResult {
    model.menu_move(delta);
    DispatchResult::dirty()
}

pub(super) fn toggle_wrap(model: &mut EditorModel) -> DispatchResult {
    let on = model.toggle_wrap();
    let msg = if on { "Word wrap on" } else { "Word wrap off" };
    model.state_mut().set_ephemeral(msg);
    DispatchResult::dirty()
}

/// File saves, Format toggles word wrap; both hand focus back to the text box.
pub(super) fn activate(model: &mut EditorModel) -> DispatchResult {
    let button = model.menu().active();
    tracing::debug!(target: "actions.dispatch", item = button.label, "menu_activate");
    match button.item {
        MenuItem::File => {
            model.focus_text();
            file::save(model.state_mut());
            DispatchResult::dirty()
        }
        MenuItem::Format => {
            model.focus_text();
            toggle_wrap(model)
        }
        MenuItem::Edit | MenuItem::View | MenuItem::Help => {
            let msg = format!("{}: Not available", button.label);
            model.state_mut().set_ephemeral(msg);
            DispatchResult::dirty()
        }
    }
}
