//! Two-stack split buffer.

use crate::TextError;
use std::fmt;
use tracing::trace;

/// Character storage split at the cursor.
///
/// `before` holds the characters preceding the cursor in document order.
/// `after` holds the characters at and following the cursor in *reverse*
/// order, so its last element is the character under the cursor. Inserting
/// pushes onto `before`; deleting pops from `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStore {
    before: Vec<char>,
    after: Vec<char>,
}

impl TextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `content` with the cursor at the end.
    pub fn from_text(content: &str) -> Self {
        let mut store = Self::new();
        store.append(content);
        store
    }

    /// Number of code points stored.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Current cursor index (the split point).
    pub fn index(&self) -> usize {
        self.before.len()
    }

    /// Character at `index`, if any.
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index < self.before.len() {
            return self.before.get(index).copied();
        }
        let offset = index - self.before.len();
        if offset >= self.after.len() {
            return None;
        }
        self.after.get(self.after.len() - 1 - offset).copied()
    }

    /// Insert `ch` so that it becomes the element at `index`.
    ///
    /// Fails without mutating when `index > len()`. The cursor advances by one
    /// when the insertion is at or before it and is otherwise left in place.
    pub fn insert(&mut self, index: usize, ch: char) -> Result<(), TextError> {
        let len = self.len();
        if index > len {
            return Err(TextError::IndexOutOfRange { index, len });
        }
        let cursor = self.index();
        if index == cursor {
            self.before.push(ch);
            return Ok(());
        }
        self.relocate(index);
        self.before.push(ch);
        let restored = if index < cursor { cursor + 1 } else { cursor };
        self.relocate(restored);
        Ok(())
    }

    /// Remove and return the character at `index`.
    ///
    /// Returns `None` (nothing to delete) when `index >= len()`; the store and
    /// cursor are untouched in that case. Deleting before the cursor shifts the
    /// cursor back by one so it keeps pointing at the same character.
    pub fn delete(&mut self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        let cursor = self.index();
        if index == cursor {
            return self.after.pop();
        }
        self.relocate(index);
        let removed = self.after.pop();
        let restored = if index < cursor { cursor - 1 } else { cursor };
        self.relocate(restored);
        removed
    }

    /// Insert every character of `text` at the end, in order.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let cursor = self.index();
        let at_end = cursor == self.len();
        self.relocate(self.len());
        self.before.extend(text.chars());
        if !at_end {
            self.relocate(cursor);
        }
    }

    /// Drop all content and reset the cursor to 0.
    pub fn clear(&mut self) {
        self.before.clear();
        self.after.clear();
    }

    /// Move the cursor to `new_index` clamped into `[0, len()]`.
    ///
    /// Returns the effective index. Cost is proportional to the distance moved.
    pub fn move_index(&mut self, new_index: isize) -> usize {
        let target = usize::try_from(new_index).unwrap_or(0).min(self.len());
        self.relocate(target);
        target
    }

    /// Full content in order.
    pub fn text(&self) -> String {
        self.chars().collect()
    }

    /// Content preceding the cursor.
    pub fn before_cursor(&self) -> String {
        self.before.iter().collect()
    }

    /// Content at and after the cursor.
    pub fn after_cursor(&self) -> String {
        self.chars_after().collect()
    }

    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.chars_before().chain(self.chars_after())
    }

    pub fn chars_before(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.before.iter().copied()
    }

    pub fn chars_after(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.after.iter().rev().copied()
    }

    fn relocate(&mut self, target: usize) {
        let from = self.before.len();
        if target > from {
            let take = target - from;
            let at = self.after.len() - take;
            self.before.extend(self.after.drain(at..).rev());
        } else if target < from {
            self.after.extend(self.before.drain(target..).rev());
        } else {
            return;
        }
        trace!(
            target: "text.store",
            from,
            to = target,
            distance = from.abs_diff(target),
            "relocate_split"
        );
    }
}

impl fmt::Display for TextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            fmt::Write::write_char(f, ch)?;
        }
        Ok(())
    }
}
