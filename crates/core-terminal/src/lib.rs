//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering switches to raw mode and the alternate screen, enables bracketed
//! paste and uses a blinking bar cursor; leaving restores all of it.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, SetCursorStyle, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{self, Write, stdout};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size as (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

/// Queue the screen setup sequence (everything except raw mode).
pub fn queue_enter<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        EnterAlternateScreen,
        EnableBracketedPaste,
        SetCursorStyle::BlinkingBar,
        Hide
    )
}

/// Queue the inverse of [`queue_enter`].
pub fn queue_leave<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        SetCursorStyle::DefaultUserShape,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        Show
    )
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            let mut out = stdout();
            queue_enter(&mut out)?;
            out.flush()?;
            self.entered = true;
            tracing::debug!(target: "terminal", "entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            let mut out = stdout();
            queue_leave(&mut out)?;
            out.flush()?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "terminal", "left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn ansi(f: fn(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn enter_sequence_switches_screen_and_enables_paste() {
        let out = ansi(queue_enter);
        assert!(out.contains("\x1b[?1049h"), "alternate screen: {out:?}");
        assert!(out.contains("\x1b[?2004h"), "bracketed paste: {out:?}");
        assert!(out.contains("\x1b[5 q"), "blinking bar: {out:?}");
    }

    #[test]
    fn leave_sequence_restores_terminal() {
        let out = ansi(queue_leave);
        assert!(out.contains("\x1b[?1049l"), "main screen: {out:?}");
        assert!(out.contains("\x1b[?2004l"), "bracketed paste off: {out:?}");
        assert!(out.contains("\x1b[0 q"), "default cursor: {out:?}");
    }
}
