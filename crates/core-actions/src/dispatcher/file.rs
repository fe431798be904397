//! Save and quit.

use super::DispatchResult;
use crate::io_ops::{WriteFileResult, write_file};
use core_state::EditorState;

/// Save to the bound file. Nothing happens for an unmodified document, and an
/// unnamed document with no content is skipped silently.
pub(super) fn save(state: &mut EditorState) -> DispatchResult {
    if !state.dirty {
        return DispatchResult::clean();
    }
    match write_file(state) {
        WriteFileResult::Success => {
            let msg = format!("Saved {}", state.display_name());
            state.set_ephemeral(msg);
        }
        WriteFileResult::NoFilename => {
            if state.store.is_empty() {
                return DispatchResult::clean();
            }
            state.set_ephemeral("No file name");
        }
        WriteFileResult::Error => state.set_ephemeral("Save failed"),
    }
    DispatchResult::dirty()
}

/// Quit, or ask for confirmation first when there are visible unsaved changes.
pub(super) fn quit(state: &mut EditorState, armed: bool) -> DispatchResult {
    if armed || !state.shows_modified() {
        tracing::info!(target: "actions.dispatch", discarded = state.dirty, "quit");
        return DispatchResult::quit();
    }
    state.quit_armed = true;
    state.set_ephemeral("Unsaved changes. Press Ctrl-W again to quit");
    DispatchResult::dirty()
}
