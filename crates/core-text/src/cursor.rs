//! Logical cursor position derived from the split point.

use crate::{LINE_BREAK, TextStore};

const CARRIAGE_RETURN: char = '\r';

/// Zero-based line and column of the cursor, in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct LogicalPosition {
    pub line: usize,
    pub column: usize,
}

impl LogicalPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Position at the end of `prefix`: one line per `'\n'`, column counted from
/// the last break.
pub fn logical_position_of(prefix: &str) -> LogicalPosition {
    position_from_chars(prefix.chars())
}

fn position_from_chars(chars: impl Iterator<Item = char>) -> LogicalPosition {
    chars.fold(LogicalPosition::default(), |pos, ch| {
        if ch == LINE_BREAK {
            LogicalPosition::new(pos.line + 1, 0)
        } else {
            LogicalPosition::new(pos.line, pos.column + 1)
        }
    })
}

impl TextStore {
    /// Cursor line and column, recomputed from the text before the cursor.
    pub fn logical_position(&self) -> LogicalPosition {
        position_from_chars(self.chars_before())
    }

    /// Number of logical lines (an empty document has one).
    pub fn line_count(&self) -> usize {
        self.chars().filter(|&c| c == LINE_BREAK).count() + 1
    }

    /// Length of `line` in code points, excluding its break. A `'\r'` right
    /// before the break belongs to the break, so column clamping never lands
    /// the cursor inside a `"\r\n"` pair. Lines past the end have length 0.
    pub fn line_len(&self, line: usize) -> usize {
        let mut current = 0;
        let mut len = 0;
        let mut last = None;
        for ch in self.chars() {
            if ch == LINE_BREAK {
                if current == line {
                    return len - usize::from(last == Some(CARRIAGE_RETURN));
                }
                current += 1;
                continue;
            }
            if current == line {
                len += 1;
                last = Some(ch);
            }
        }
        len
    }

    /// Linear index of `pos`. The line is clamped to the last line and the
    /// column to that line's length.
    pub fn index_of(&self, pos: LogicalPosition) -> usize {
        let last_line = self.line_count() - 1;
        let line = pos.line.min(last_line);
        let mut index = 0;
        let mut current = 0;
        for ch in self.chars() {
            if current == line {
                break;
            }
            if ch == LINE_BREAK {
                current += 1;
            }
            index += 1;
        }
        index + pos.column.min(self.line_len(line))
    }
}
