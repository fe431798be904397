//! Status line composition.
//!
//! Format: `Ln X, Col Y` on the left, followed by the ephemeral message when
//! one is active, and `| 100% | <line ending> | <encoding> ` right aligned.
//!
//! Two stages:
//! 1. `compose_status` produces ordered `StatusSegment`s.
//! 2. `format_status` lays them out for a given width.

use core_state::EditorState;
use core_text::LogicalPosition;
use unicode_width::UnicodeWidthStr;

/// What the status line needs from the editor.
pub struct StatusContext<'a> {
    pub position: LogicalPosition,
    pub message: Option<&'a str>,
    pub line_ending: &'a str,
    pub encoding: &'a str,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState, position: LogicalPosition) -> Self {
        Self {
            position,
            message: state.ephemeral_text(),
            line_ending: state.options.line_ending.label(),
            encoding: &state.options.encoding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// 1-based cursor line and column.
    Position { line_1: usize, col_1: usize },
    Message(&'a str),
    /// Right-aligned document details.
    Details {
        zoom: &'static str,
        line_ending: &'a str,
        encoding: &'a str,
    },
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(3);
    out.push(StatusSegment::Position {
        line_1: ctx.position.line + 1,
        col_1: ctx.position.column + 1,
    });
    if let Some(msg) = ctx.message {
        out.push(StatusSegment::Message(msg));
    }
    out.push(StatusSegment::Details {
        zoom: "100%",
        line_ending: ctx.line_ending,
        encoding: ctx.encoding,
    });
    out
}

/// Lay segments out in `width` columns. Left segments are separated by two
/// spaces; details are pushed to the right edge when there is room, else
/// they follow the left part after one space (and get clipped by painting).
pub fn format_status(segments: &[StatusSegment<'_>], width: u16) -> String {
    let mut left = String::with_capacity(width as usize);
    let mut right = String::new();
    for seg in segments {
        match seg {
            StatusSegment::Position { line_1, col_1 } => {
                left.push_str(&format!("Ln {line_1}, Col {col_1}"));
            }
            StatusSegment::Message(msg) => {
                left.push_str("  ");
                left.push_str(msg);
            }
            StatusSegment::Details {
                zoom,
                line_ending,
                encoding,
            } => {
                right = format!("| {zoom} | {line_ending} | {encoding} ");
            }
        }
    }
    let used = left.width() + right.width();
    let width = width as usize;
    if used < width {
        left.push_str(&" ".repeat(width - used));
    } else if !right.is_empty() {
        left.push(' ');
    }
    left.push_str(&right);
    left
}
