//! Split-buffer text storage and cursor addressing.
//!
//! The document is a sequence of Unicode scalar values (`char`) held by
//! [`TextStore`] as two stacks meeting at the cursor. Edits at the cursor are
//! O(1) pushes/pops; an edit anywhere else first relocates the split point, at
//! a cost proportional to the distance moved.
//!
//! Invariants (hold after every public call):
//! * `store.chars_before().count() == store.index()`.
//! * `store.before_cursor() + store.after_cursor() == store.text()`.
//! * `store.index() <= store.len()`.
//!
//! The cursor's logical `(line, column)` is never stored. [`LogicalPosition`]
//! is derived from the text before the cursor on every query, so there is no
//! second piece of state to keep in sync with edits.

mod cursor;
mod store;
mod width;

pub use cursor::{LogicalPosition, logical_position_of};
pub use store::TextStore;
pub use width::char_width;

/// The line-break character. `"\r\n"` files keep their `'\r'` as ordinary text.
pub const LINE_BREAK: char = '\n';

/// Errors raised by [`TextStore`] index-addressed operations.
///
/// An out-of-range index is a caller bug (the cursor index is always kept in
/// range), so it is surfaced rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("index {index} out of range for text of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
