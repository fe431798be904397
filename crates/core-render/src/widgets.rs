//! Screen widgets painted into a `Frame`: title bar, menu bar, rules, text
//! rows and status bar. Each takes the `LayoutRegion` it owns and paints
//! nothing when the region is empty.

use crate::status::{StatusContext, compose_status, format_status};
use crate::{APP_NAME, CellFlags, Frame, char_cells};
use core_model::{Focus, LayoutRegion, MenuBar};
use core_state::EditorState;
use core_text::LogicalPosition;

/// `🗒 [*]<name> - oxpad`.
pub fn title_text(state: &EditorState) -> String {
    let marker = if state.shows_modified() { "*" } else { "" };
    format!("🗒 {marker}{} - {APP_NAME}", state.display_name())
}

pub fn paint_title(frame: &mut Frame, region: LayoutRegion, state: &EditorState) {
    if region.is_empty() {
        return;
    }
    frame.draw_text(
        region.x,
        region.y,
        region.x + region.width,
        &title_text(state),
        CellFlags::empty(),
    );
}

/// Buttons at their fixed columns with the hotkey underlined; the selected
/// button is reversed while the menu has focus.
pub fn paint_menu(frame: &mut Frame, region: LayoutRegion, menu: &MenuBar, focus: Focus) {
    if region.is_empty() {
        return;
    }
    let max_x = region.x + region.width;
    for (i, button) in menu.buttons().iter().enumerate() {
        let x = region.x + button.column;
        let flags = if focus == Focus::Menu && i == menu.active_index() {
            CellFlags::REVERSE
        } else {
            CellFlags::empty()
        };
        let end = frame.draw_text(x, region.y, max_x, button.label, flags);
        let hotkey_x = x + button.hotkey_index as u16;
        if hotkey_x < end {
            frame.set_flags(hotkey_x, region.y, 1, CellFlags::UNDERLINE);
        }
    }
}

pub fn paint_rules(frame: &mut Frame, rows: &[u16]) {
    for &y in rows {
        frame.draw_hline(y, CellFlags::empty());
    }
}

/// Paint laid-out rows; the region is already blank.
pub fn paint_text_rows(frame: &mut Frame, region: LayoutRegion, rows: &[String]) {
    if region.is_empty() {
        return;
    }
    let max_x = region.x + region.width;
    for (dy, row) in rows.iter().take(region.height as usize).enumerate() {
        frame.draw_text(region.x, region.y + dy as u16, max_x, row, CellFlags::empty());
    }
}

/// Screen column of display column `col` within `row`, accounting for wide
/// glyphs, clamped to the region.
pub fn cursor_screen_x(region: LayoutRegion, row: &str, col: usize) -> u16 {
    let mut chars = row.chars();
    let offset: usize = (0..col)
        .map(|_| chars.next().map_or(1, |c| char_cells(c) as usize))
        .sum();
    region.x + offset.min(region.width.saturating_sub(1) as usize) as u16
}

pub fn paint_status(
    frame: &mut Frame,
    region: LayoutRegion,
    state: &EditorState,
    position: LogicalPosition,
) {
    if region.is_empty() {
        return;
    }
    let ctx = StatusContext::from_state(state, position);
    let line = format_status(&compose_status(&ctx), region.width);
    frame.draw_text(
        region.x,
        region.y,
        region.x + region.width,
        &line,
        CellFlags::empty(),
    );
}
