//! Terminal writer: collects primitive commands for one frame and flushes them
//! in a single pass into any `io::Write` (stdout at runtime, a `Vec<u8>` in
//! tests).
//!
//! Batching rules:
//! * Consecutive unstyled prints are merged into one `Print`.
//! * A styled print, a move or a cursor visibility change ends the batch.
//!
//! `print_commands` counts `Print`s issued after batching and `cells_printed`
//! counts glyphs handed to `print`, so `print_commands <= cells_printed`.

use crate::CellFlags;
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    Print(String),
    Styled(String, CellFlags),
    ShowCursor(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterStats {
    pub print_commands: u64,
    pub cells_printed: u64,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pending_plain: String,
    stats: WriterStats,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_pending(&mut self) {
        if self.pending_plain.is_empty() {
            return;
        }
        let s = std::mem::take(&mut self.pending_plain);
        self.cmds.push(Command::Print(s));
        self.stats.print_commands += 1;
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.flush_pending();
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn show_cursor(&mut self, visible: bool) {
        self.flush_pending();
        self.cmds.push(Command::ShowCursor(visible));
    }

    pub fn print(&mut self, s: &str, flags: CellFlags) {
        if s.is_empty() {
            return;
        }
        self.stats.cells_printed += 1;
        if flags.is_empty() {
            self.pending_plain.push_str(s);
            return;
        }
        self.flush_pending();
        self.cmds.push(Command::Styled(s.to_string(), flags));
        self.stats.print_commands += 1;
    }

    /// Commands queued so far, including the pending batch.
    pub fn commands(&mut self) -> &[Command] {
        self.flush_pending();
        &self.cmds
    }

    pub fn flush_to<W: Write>(mut self, out: &mut W) -> Result<WriterStats> {
        self.flush_pending();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Styled(s, flags) => {
                    if flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if flags.contains(CellFlags::UNDERLINE) {
                        queue!(out, SetAttribute(Attribute::Underlined))?;
                    }
                    queue!(out, Print(s), SetAttribute(Attribute::Reset))?;
                }
                Command::ShowCursor(true) => queue!(out, Show)?,
                Command::ShowCursor(false) => queue!(out, Hide)?,
            }
        }
        out.flush()?;
        Ok(self.stats)
    }
}
