//! Async terminal input service.
//!
//! A Tokio task reads `crossterm::event::EventStream` and forwards normalized
//! `core_events::Event`s over the runtime channel until it is told to stop,
//! the channel closes, or the stream ends.

mod async_service;
mod key_map;

pub use async_service::AsyncInputShutdown;
pub use key_map::{map_key_code, map_mods};

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the task handle alongside a shutdown handle that requests
/// immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

#[inline]
pub(crate) fn log_paste(text: &str) {
    tracing::trace!(target: "input.paste", len = text.len(), "paste_received");
}
