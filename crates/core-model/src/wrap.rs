//! Line layout: turns the two halves of the store into visible display rows
//! and the cursor's display coordinates.
//!
//! Layout is a pure function recomputed on every render. Wrapping is by
//! character, not by word, and rows are measured in terminal cells: a char
//! that would not fit in what is left of the row starts a new one. A row is
//! only opened when a char actually needs it, so a line of exactly `width`
//! cells is one row and the rows never depend on where the cursor splits the
//! text. A cursor sitting right after a full row is shown at column 0 of the
//! following row.

use core_text::{LINE_BREAK, char_width};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Wrap,
    NoWrap,
}

impl WrapMode {
    pub fn from_word_wrap(word_wrap: bool) -> Self {
        if word_wrap {
            WrapMode::Wrap
        } else {
            WrapMode::NoWrap
        }
    }
}

/// Geometry and scroll state for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRequest {
    pub width: usize,
    pub height: usize,
    /// First display row of the window.
    pub top_row: usize,
    /// Horizontal offset, used only by [`WrapMode::NoWrap`].
    pub left_offset: usize,
    pub mode: WrapMode,
}

impl LayoutRequest {
    pub fn new(width: usize, height: usize, mode: WrapMode) -> Self {
        Self {
            width,
            height,
            top_row: 0,
            left_offset: 0,
            mode,
        }
    }

    fn window(&self) -> Range<usize> {
        self.top_row..self.top_row + self.height
    }
}

/// Cursor position relative to the text region origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayCursor {
    pub row: usize,
    pub col: usize,
}

impl DisplayCursor {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayLayout {
    /// At most `height` rows, each at most `width` chars.
    pub rows: Vec<String>,
    pub cursor: DisplayCursor,
    /// Cursor row counted from the first display row of the document.
    pub cursor_row_abs: usize,
    pub cursor_visible: bool,
}

/// Lay out `before` (text preceding the cursor) followed by `after`.
pub fn layout<B, A>(request: &LayoutRequest, before: B, after: A) -> DisplayLayout
where
    B: IntoIterator<Item = char>,
    A: IntoIterator<Item = char>,
{
    if request.width == 0 || request.height == 0 {
        return DisplayLayout::default();
    }
    match request.mode {
        WrapMode::Wrap => layout_wrapped(request, before, after),
        WrapMode::NoWrap => layout_unwrapped(request, before, after),
    }
}

/// Absolute display row of the cursor, packing only the text before it.
pub fn cursor_display_row<B>(before: B, width: usize, mode: WrapMode) -> usize
where
    B: IntoIterator<Item = char>,
{
    match mode {
        WrapMode::NoWrap => before.into_iter().filter(|&c| c == LINE_BREAK).count(),
        WrapMode::Wrap if width == 0 => 0,
        WrapMode::Wrap => {
            let mut packer = RowPacker::new(width, 0..0);
            before.into_iter().for_each(|ch| packer.push(ch));
            packer.cursor().0
        }
    }
}

struct RowPacker {
    width: usize,
    window: Range<usize>,
    row: usize,
    /// Chars in the current row.
    col: usize,
    /// Cells used by the current row.
    cells: usize,
    current: String,
    rows: Vec<String>,
}

impl RowPacker {
    fn new(width: usize, window: Range<usize>) -> Self {
        Self {
            width,
            window,
            row: 0,
            col: 0,
            cells: 0,
            current: String::new(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, ch: char) {
        if ch == LINE_BREAK {
            self.close_row();
            return;
        }
        let w = char_width(ch);
        // A glyph wider than the whole row still gets a row of its own.
        if self.cells > 0 && self.cells + w > self.width {
            self.close_row();
        }
        if self.in_window() {
            self.current.push(ch);
        }
        self.col += 1;
        self.cells += w;
    }

    fn close_row(&mut self) {
        if self.in_window() {
            self.rows.push(std::mem::take(&mut self.current));
        }
        self.row += 1;
        self.col = 0;
        self.cells = 0;
    }

    /// Display position of the next char to be pushed.
    fn cursor(&self) -> (usize, usize) {
        if self.cells >= self.width {
            (self.row + 1, 0)
        } else {
            (self.row, self.col)
        }
    }

    fn in_window(&self) -> bool {
        self.window.contains(&self.row)
    }

    fn window_filled(&self) -> bool {
        self.row >= self.window.end
    }

    fn finish(mut self) -> Vec<String> {
        if self.in_window() {
            self.rows.push(self.current);
        }
        self.rows
    }
}

fn layout_wrapped<B, A>(request: &LayoutRequest, before: B, after: A) -> DisplayLayout
where
    B: IntoIterator<Item = char>,
    A: IntoIterator<Item = char>,
{
    let window = request.window();
    let mut packer = RowPacker::new(request.width, window.clone());
    for ch in before {
        packer.push(ch);
    }
    let (cursor_row_abs, cursor_col) = packer.cursor();
    for ch in after {
        if packer.window_filled() {
            break;
        }
        packer.push(ch);
    }
    let (cursor, cursor_visible) = clamp_cursor(&window, cursor_row_abs, cursor_col);
    DisplayLayout {
        rows: packer.finish(),
        cursor,
        cursor_row_abs,
        cursor_visible,
    }
}

fn layout_unwrapped<B, A>(request: &LayoutRequest, before: B, after: A) -> DisplayLayout
where
    B: IntoIterator<Item = char>,
    A: IntoIterator<Item = char>,
{
    let window = request.window();
    let columns = request.left_offset..request.left_offset + request.width;
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut line = 0usize;
    let mut column = 0usize;
    let mut cursor_at = None;
    let mut before = before.into_iter().fuse();
    let mut after = after.into_iter();
    loop {
        let ch = match before.next() {
            Some(ch) => ch,
            None => {
                if cursor_at.is_none() {
                    cursor_at = Some((line, column));
                }
                if line >= window.end {
                    break;
                }
                match after.next() {
                    Some(ch) => ch,
                    None => break,
                }
            }
        };
        if ch == LINE_BREAK {
            if window.contains(&line) {
                rows.push(std::mem::take(&mut current));
            }
            line += 1;
            column = 0;
            continue;
        }
        if window.contains(&line) && columns.contains(&column) {
            current.push(ch);
        }
        column += 1;
    }
    if window.contains(&line) {
        rows.push(current);
    }
    let (cursor_line, cursor_column) = cursor_at.unwrap_or((line, column));
    let (mut cursor, mut cursor_visible) = clamp_cursor(&window, cursor_line, 0);
    let offset = cursor_column.saturating_sub(request.left_offset);
    cursor.col = offset.min(request.width - 1);
    cursor_visible &= columns.contains(&cursor_column);
    DisplayLayout {
        rows,
        cursor,
        cursor_row_abs: cursor_line,
        cursor_visible,
    }
}

fn clamp_cursor(window: &Range<usize>, row_abs: usize, col: usize) -> (DisplayCursor, bool) {
    let visible = window.contains(&row_abs);
    let last = window.end - window.start - 1;
    let row = row_abs.saturating_sub(window.start).min(last);
    (DisplayCursor::new(row, col), visible)
}
