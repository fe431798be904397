//! Terminal cell width of a char, shared by layout and painting so a wrapped
//! row never measures differently from how it is drawn.

use unicode_width::UnicodeWidthChar;

/// Columns `c` occupies when painted. Control chars (tab included) paint as a
/// single space; zero-width chars still take one cell.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 1;
    }
    c.width().unwrap_or(1).max(1)
}
