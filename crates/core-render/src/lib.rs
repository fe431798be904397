//! Rendering primitives, screen widgets and the repaint engine.
//!
//! A `Frame` is a grid of cells. Each glyph occupies a leader cell followed by
//! `width - 1` continuation cells; emission prints leaders only and relies on
//! the terminal to advance over wide glyphs.
//!
//! Invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty.
//! - A glyph that does not fit before the right edge is not drawn.
//!
//! Exposed Components:
//! - `Cell` / `Frame`: the grid plus `draw_text`, `draw_hline`, `set_flags`.
//! - `widgets`: title bar, menu bar, rules, text rows and status bar painting.
//! - `status`: status line segments and formatting.
//! - `writer`: batched crossterm command emission into any `io::Write`.
//! - `render_engine`: frame composition from the model and row diffing.

use bitflags::bitflags;

pub mod render_engine;
pub mod status;
pub mod widgets;
pub mod writer;

pub use render_engine::{ComposedFrame, RenderEngine, RenderMetrics, compose_frame};

/// Application name shown in the title bar.
pub const APP_NAME: &str = "oxpad";

/// Glyph used for horizontal rules.
pub const HLINE: char = '─';

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE   = 0b0000_0001;
        const UNDERLINE = 0b0000_0010;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Glyph text (leader cells only). Empty for continuation cells.
    pub cluster: String,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.max(1) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
    #[inline]
    pub fn visual_width(&self) -> u16 {
        self.width as u16
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

/// Char as painted: tab and other control chars become a single space.
#[inline]
pub fn display_char(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

/// Columns a painted char occupies (at least one).
#[inline]
pub fn char_cells(c: char) -> u16 {
    core_text::char_width(c) as u16
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set a glyph at (x,y) and fill continuation cells for its width. Glyphs
    /// crossing the right edge are dropped.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        let w = width.max(1);
        if y >= self.height || x.saturating_add(w) > self.width {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
    }

    /// Paint `text` from column `x` up to (not including) `max_x`. Returns the
    /// column after the last painted glyph.
    pub fn draw_text(&mut self, x: u16, y: u16, max_x: u16, text: &str, flags: CellFlags) -> u16 {
        let limit = max_x.min(self.width);
        let mut col = x;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let shown = display_char(c);
            let w = char_cells(c);
            if col.saturating_add(w) > limit {
                break;
            }
            self.set_cluster(col, y, shown.encode_utf8(&mut buf), w, flags);
            col += w;
        }
        col
    }

    /// Fill row `y` with the rule glyph.
    pub fn draw_hline(&mut self, y: u16, flags: CellFlags) {
        let mut buf = [0u8; 4];
        let glyph: &str = HLINE.encode_utf8(&mut buf);
        for x in 0..self.width {
            self.set_cluster(x, y, glyph, 1, flags);
        }
    }

    /// Add `flags` to `span` cells starting at (x,y).
    pub fn set_flags(&mut self, x: u16, y: u16, span: u16, flags: CellFlags) {
        let span = span.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Iterate leader cells of a row, yielding (&str, width, flags, start_x).
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let width = if y < self.height { self.width } else { 0 };
        let start = y as usize * self.width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let cell = &self.cells[start + x as usize];
                if cell.is_leader() {
                    let w = cell.visual_width();
                    let out = (cell.cluster.as_str(), w, cell.flags, x);
                    x = x.saturating_add(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Row cells as a slice (for diffing).
    pub fn row(&self, y: u16) -> &[Cell] {
        match self.index(0, y) {
            Some(start) => &self.cells[start..start + self.width as usize],
            None => &[],
        }
    }

    /// Concatenated leader text of a row (tests / diagnostics).
    pub fn row_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(c, _, _, _)| c).collect()
    }
}
