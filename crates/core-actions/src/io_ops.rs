//! File IO helpers used by startup and the save action.
//!
//! Content is never normalized: a file is loaded as-is and saved as the exact
//! bytes of `TextStore::text()`.

use core_state::EditorState;
use std::path::{Path, PathBuf};

/// Result of attempting to open a file.
#[derive(Debug)]
pub enum OpenFileResult {
    Success(OpenSuccess),
    /// Read failed; already logged on target `io`.
    Error,
}

#[derive(Debug)]
pub struct OpenSuccess {
    pub content: String,
    pub file_name: PathBuf,
    /// False when the path did not exist yet and the document starts empty.
    pub existed: bool,
}

impl OpenSuccess {
    /// Load the content into `state` and bind it to the path.
    pub fn apply(self, state: &mut EditorState) {
        state.load_text(&self.content);
        state.set_file_name(&self.file_name);
    }
}

/// Read `path` as UTF-8. A missing file yields an empty document bound to the
/// path so the first save creates it.
pub fn open_file(path: &Path) -> OpenFileResult {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::info!(target: "io", path = %path.display(), chars = content.chars().count(), "file_opened");
            OpenFileResult::Success(OpenSuccess {
                content,
                file_name: path.to_path_buf(),
                existed: true,
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "file_not_found_new_document");
            OpenFileResult::Success(OpenSuccess {
                content: String::new(),
                file_name: path.to_path_buf(),
                existed: false,
            })
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, path = %path.display(), "file_open_error");
            OpenFileResult::Error
        }
    }
}

/// Result of a write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFileResult {
    Success,
    NoFilename,
    Error,
}

/// Write the document to its bound file name, clearing `dirty` on success.
pub fn write_file(state: &mut EditorState) -> WriteFileResult {
    let Some(path) = state.file_name.clone() else {
        return WriteFileResult::NoFilename;
    };
    let content = state.store.text();
    match std::fs::write(&path, content.as_bytes()) {
        Ok(()) => {
            state.dirty = false;
            tracing::info!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
            WriteFileResult::Success
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, path = %path.display(), "file_write_error");
            WriteFileResult::Error
        }
    }
}
