//! Text mutation and cursor motion in the text box.

use super::DispatchResult;
use crate::MotionKind;
use core_model::EditorModel;
use core_text::TextError;

pub(super) fn insert(model: &mut EditorModel, c: char) -> Result<DispatchResult, TextError> {
    model.insert(c)?;
    Ok(DispatchResult::dirty())
}

pub(super) fn paste(model: &mut EditorModel, text: &str) -> Result<DispatchResult, TextError> {
    if text.is_empty() {
        return Ok(DispatchResult::clean());
    }
    model.insert_str(text)?;
    tracing::debug!(target: "actions.dispatch", len = text.len(), "paste_applied");
    Ok(DispatchResult::dirty())
}

pub(super) fn backspace(model: &mut EditorModel) -> DispatchResult {
    match model.backspace() {
        Some(_) => DispatchResult::dirty(),
        None => DispatchResult::clean(),
    }
}

pub(super) fn delete(model: &mut EditorModel) -> DispatchResult {
    match model.delete() {
        Some(_) => DispatchResult::dirty(),
        None => DispatchResult::clean(),
    }
}

pub(super) fn motion(model: &mut EditorModel, kind: MotionKind) -> DispatchResult {
    let before = model.cursor_index();
    let after = match kind {
        MotionKind::Left => model.move_left(),
        MotionKind::Right => model.move_right(),
        MotionKind::Up => model.move_up(),
        MotionKind::Down => model.move_down(),
        MotionKind::LineStart => model.move_line_start(),
        MotionKind::LineEnd => model.move_line_end(),
    };
    if before == after {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    }
}
