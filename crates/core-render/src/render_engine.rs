//! RenderEngine: composes a full `Frame` from the model each time and repaints
//! only the rows that differ from the previously emitted frame.
//!
//! A size change (or an explicit `invalidate`) drops the previous frame, so
//! the next render repaints every row. The terminal cursor is placed after the
//! rows and shown only while the text box has focus and the cursor is inside
//! the text region.

use crate::widgets::{
    cursor_screen_x, paint_menu, paint_rules, paint_status, paint_text_rows, paint_title,
};
use crate::writer::Writer;
use crate::{Frame, widgets};
use anyhow::Result;
use core_model::{EditorModel, Focus, Layout};
use std::io::Write;

/// A composed screen plus where the terminal cursor goes, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedFrame {
    pub frame: Frame,
    pub cursor: Option<(u16, u16)>,
}

/// Lay out and paint the whole screen for a `width` x `height` terminal.
/// Scroll offsets in the model are updated for the current geometry.
pub fn compose_frame(model: &mut EditorModel, width: u16, height: u16) -> ComposedFrame {
    let layout = Layout::compute(width, height);
    let mut frame = Frame::new(width, height);

    paint_title(&mut frame, layout.title, model.state());
    paint_rules(&mut frame, layout.rule_rows());
    paint_menu(&mut frame, layout.menu, model.menu(), model.focus());

    let mut cursor = None;
    if !layout.text.is_empty() {
        let text = layout.text;
        let display = model.display_layout(text.width as usize, text.height as usize);
        paint_text_rows(&mut frame, text, &display.rows);
        if model.focus() == Focus::Text && display.cursor_visible {
            let row = display
                .rows
                .get(display.cursor.row)
                .map_or("", String::as_str);
            let x = cursor_screen_x(text, row, display.cursor.col);
            cursor = Some((x, text.y + display.cursor.row as u16));
        }
    }

    paint_status(&mut frame, layout.status, model.state(), model.cursor_xy());
    ComposedFrame { frame, cursor }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderMetrics {
    pub full_frames: u64,
    pub partial_frames: u64,
    pub rows_repainted: u64,
    pub print_commands: u64,
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    prev: Option<Frame>,
    metrics: RenderMetrics,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the emitted frame; the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Window title for the terminal.
    pub fn window_title(model: &EditorModel) -> String {
        widgets::title_text(model.state())
    }

    /// Compose, diff against the previous frame, and flush the changes into
    /// `out`. Returns the number of rows repainted.
    pub fn render<W: Write>(
        &mut self,
        model: &mut EditorModel,
        width: u16,
        height: u16,
        out: &mut W,
    ) -> Result<usize> {
        let composed = compose_frame(model, width, height);
        let frame = composed.frame;
        let full = self
            .prev
            .as_ref()
            .is_none_or(|p| p.width != frame.width || p.height != frame.height);

        let mut writer = Writer::new();
        writer.show_cursor(false);
        let mut repainted = 0usize;
        for y in 0..frame.height {
            let changed = full || self.prev.as_ref().is_some_and(|p| p.row(y) != frame.row(y));
            if !changed {
                continue;
            }
            writer.move_to(0, y);
            for (cluster, _w, flags, _x) in frame.row_leaders(y) {
                writer.print(cluster, flags);
            }
            repainted += 1;
        }
        if let Some((x, y)) = composed.cursor {
            writer.move_to(x, y);
            writer.show_cursor(true);
        }
        let stats = writer.flush_to(out)?;

        if full {
            self.metrics.full_frames += 1;
        } else {
            self.metrics.partial_frames += 1;
        }
        self.metrics.rows_repainted += repainted as u64;
        self.metrics.print_commands += stats.print_commands;
        tracing::trace!(target: "render.engine", full, rows = repainted, prints = stats.print_commands, "frame");
        self.prev = Some(frame);
        Ok(repainted)
    }
}
