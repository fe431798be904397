//! Horizontal and vertical scroll offsets.

/// Left offset for no-wrap rendering.
///
/// Invariant after every [`adjust`](Self::adjust): `left <= column` and
/// `column - left <= bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorizontalScroll {
    left: usize,
}

impl HorizontalScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self) -> usize {
        self.left
    }

    /// Move `left` the minimum distance that brings `cursor_column` back into
    /// `[left, left + bound]`. Returns the new offset.
    pub fn adjust(&mut self, cursor_column: usize, bound: usize) -> usize {
        if cursor_column < self.left {
            self.left = cursor_column;
        } else if cursor_column - self.left > bound {
            self.left = cursor_column - bound;
        }
        self.left
    }

    /// Back to column 0 (wrap mode toggled).
    pub fn reset(&mut self) {
        self.left = 0;
    }
}

/// Compute the desired new first visible row to keep the cursor within the
/// vertical viewport subject to a top/bottom margin.
///
/// `margin` is clamped to `text_height / 2`. Returns `Some(new_first)` if a
/// scroll is needed, else `None` when the cursor is already inside the band.
pub fn compute_scroll_intent(
    first: usize,
    cursor_row: usize,
    text_height: usize,
    margin: usize,
) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let m = margin.min(text_height / 2);
    let bottom = first + text_height;
    if cursor_row < first + m {
        let new_first = cursor_row.saturating_sub(m);
        if new_first != first {
            return Some(new_first);
        }
    } else if cursor_row + m >= bottom {
        let new_first = cursor_row + m + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
    }
    None
}
