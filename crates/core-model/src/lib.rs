//! High-level editor model: the text box.
//!
//! `EditorModel` owns the document (`EditorState`), the presentation state of
//! the single text view (`View`: vertical window origin and horizontal
//! scroll), keyboard focus and the menu bar selection. Every public mutator
//! leaves the store, the cursor and the scroll offsets consistent, so the
//! renderer can lay out at any time.
//!
//! Invariants (after every public call):
//! * In no-wrap mode, `0 <= column - left <= width - 1` for the last known
//!   text width (`width > 0`).
//! * In wrap mode `left == 0`.
//! * `display_layout` always reports the cursor inside the window unless the
//!   geometry is degenerate.

use core_state::EditorState;
use core_text::{LogicalPosition, TextError};

mod layout;
pub mod menu;
pub mod scroll;
pub mod wrap;

pub use layout::{Layout, LayoutRegion, MENU_ROW, TEXT_START_ROW, TITLE_ROW};
pub use menu::{MENU_BUTTONS, MenuBar, MenuButton, MenuItem};
pub use scroll::{HorizontalScroll, compute_scroll_intent};
pub use wrap::{DisplayCursor, DisplayLayout, LayoutRequest, WrapMode};

/// Which element receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Text,
    Menu,
}

/// Scroll state of the text view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct View {
    /// First display row shown in the text region.
    pub top_row: usize,
    pub hscroll: HorizontalScroll,
}

#[derive(Debug)]
pub struct EditorModel {
    state: EditorState,
    view: View,
    focus: Focus,
    menu: MenuBar,
    text_width: usize,
    text_height: usize,
    vertical_margin: usize,
}

impl EditorModel {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            view: View::default(),
            focus: Focus::Text,
            menu: MenuBar::default(),
            text_width: 0,
            text_height: 0,
            vertical_margin: 0,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn menu(&self) -> &MenuBar {
        &self.menu
    }

    pub fn wrap_mode(&self) -> WrapMode {
        WrapMode::from_word_wrap(self.state.options.word_wrap)
    }

    pub fn set_vertical_margin(&mut self, margin: usize) {
        self.vertical_margin = margin;
    }

    /// Full document text.
    pub fn content(&self) -> String {
        self.state.store.text()
    }

    pub fn cursor_index(&self) -> usize {
        self.state.store.index()
    }

    /// Logical cursor position for the status bar.
    pub fn cursor_xy(&self) -> LogicalPosition {
        self.state.store.logical_position()
    }

    /// Insert `ch` at the cursor; the cursor ends up after it.
    pub fn insert(&mut self, ch: char) -> Result<(), TextError> {
        let at = self.state.store.index();
        self.state.store.insert(at, ch)?;
        self.state.dirty = true;
        self.after_cursor_move();
        Ok(())
    }

    /// Insert pasted text at the cursor.
    pub fn insert_str(&mut self, text: &str) -> Result<(), TextError> {
        for ch in text.chars() {
            let at = self.state.store.index();
            self.state.store.insert(at, ch)?;
        }
        if !text.is_empty() {
            self.state.dirty = true;
        }
        self.after_cursor_move();
        Ok(())
    }

    /// Delete the char before the cursor, moving the cursor back onto its slot.
    pub fn backspace(&mut self) -> Option<char> {
        let at = self.state.store.index().checked_sub(1)?;
        let removed = self.state.store.delete(at)?;
        self.state.dirty = true;
        self.after_cursor_move();
        Some(removed)
    }

    /// Delete the char under the cursor; the cursor does not move.
    pub fn delete(&mut self) -> Option<char> {
        let at = self.state.store.index();
        let removed = self.state.store.delete(at)?;
        self.state.dirty = true;
        Some(removed)
    }

    /// Move the cursor (clamped) and keep it horizontally in view.
    pub fn set_cursor_index(&mut self, index: isize) -> usize {
        let effective = self.state.store.move_index(index);
        self.after_cursor_move();
        effective
    }

    pub fn move_left(&mut self) -> usize {
        self.set_cursor_index(self.cursor_index() as isize - 1)
    }

    pub fn move_right(&mut self) -> usize {
        self.set_cursor_index(self.cursor_index() as isize + 1)
    }

    /// Previous logical line, same column where possible. No-op on line 0.
    pub fn move_up(&mut self) -> usize {
        let pos = self.cursor_xy();
        match pos.line.checked_sub(1) {
            Some(line) => self.move_to(LogicalPosition::new(line, pos.column)),
            None => self.cursor_index(),
        }
    }

    /// Next logical line, same column where possible. No-op on the last line.
    pub fn move_down(&mut self) -> usize {
        let pos = self.cursor_xy();
        if pos.line + 1 >= self.state.store.line_count() {
            return self.cursor_index();
        }
        self.move_to(LogicalPosition::new(pos.line + 1, pos.column))
    }

    pub fn move_line_start(&mut self) -> usize {
        let pos = self.cursor_xy();
        self.move_to(LogicalPosition::new(pos.line, 0))
    }

    pub fn move_line_end(&mut self) -> usize {
        let pos = self.cursor_xy();
        self.move_to(LogicalPosition::new(pos.line, usize::MAX))
    }

    fn move_to(&mut self, pos: LogicalPosition) -> usize {
        let index = self.state.store.index_of(pos);
        self.set_cursor_index(index as isize)
    }

    /// Flip word wrap. Both scroll offsets restart from the origin.
    pub fn toggle_wrap(&mut self) -> bool {
        self.state.options.word_wrap = !self.state.options.word_wrap;
        self.view = View::default();
        self.after_cursor_move();
        self.state.options.word_wrap
    }

    /// Record the text region size used between renders.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.text_width = width;
        self.text_height = height;
        self.after_cursor_move();
    }

    /// Lay out the text region for `width` x `height` cells, scrolling first so
    /// the cursor is inside the window.
    pub fn display_layout(&mut self, width: usize, height: usize) -> DisplayLayout {
        self.resize(width, height);
        let mode = self.wrap_mode();
        let store = &self.state.store;
        let cursor_row = wrap::cursor_display_row(store.chars_before(), width, mode);
        if let Some(top) =
            compute_scroll_intent(self.view.top_row, cursor_row, height, self.vertical_margin)
        {
            self.view.top_row = top;
        }
        let request = LayoutRequest {
            width,
            height,
            top_row: self.view.top_row,
            left_offset: self.view.hscroll.left(),
            mode,
        };
        wrap::layout(&request, store.chars_before(), store.chars_after())
    }

    pub fn focus_text(&mut self) {
        self.focus = Focus::Text;
    }

    /// Give the menu focus, selecting the button for `hotkey` when it matches.
    pub fn focus_menu(&mut self, hotkey: Option<char>) {
        self.focus = Focus::Menu;
        if let Some(key) = hotkey {
            self.menu.select_hotkey(key);
        }
    }

    pub fn menu_move(&mut self, delta: isize) {
        self.menu.move_by(delta);
    }

    fn after_cursor_move(&mut self) {
        match self.wrap_mode() {
            WrapMode::Wrap => self.view.hscroll.reset(),
            WrapMode::NoWrap if self.text_width > 0 => {
                let column = self.state.store.logical_position().column;
                self.view.hscroll.adjust(column, self.text_width - 1);
            }
            WrapMode::NoWrap => {}
        }
    }
}
