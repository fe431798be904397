//! Event loop: owns the model and processes one event fully (dispatch,
//! relayout, render) before taking the next.

use anyhow::Result;
use core_actions::{Action, KeyTranslator, dispatch};
use core_config::{Config, ConfigContext};
use core_events::{Event, InputEvent, KeyEvent};
use core_input::AsyncInputShutdown;
use core_model::{EditorModel, Focus};
use core_render::RenderEngine;
use core_text::TextError;
use crossterm::{queue, terminal::SetTitle};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

/// Reads the terminal size at render time; `None` keeps the last known size.
pub(crate) type SizeFn = fn() -> Option<(u16, u16)>;

pub(crate) struct RuntimeChannels {
    pub tx: mpsc::Sender<Event>,
    pub rx: mpsc::Receiver<Event>,
    pub source_handles: Vec<JoinHandle<()>>,
    pub input_task: Option<JoinHandle<()>>,
    pub input_shutdown: Option<AsyncInputShutdown>,
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    CtrlC,
    ActionQuit,
    ShutdownEvent,
    ChannelClosed,
    Fatal,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
            ShutdownReason::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

pub(crate) struct EditorRuntime<W: Write> {
    model: EditorModel,
    config: Config,
    translator: KeyTranslator,
    render_engine: RenderEngine,
    out: W,
    size_fn: SizeFn,
    last_size: (u16, u16),
    last_title: String,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
}

impl<W: Write> EditorRuntime<W> {
    pub(crate) fn new(
        model: EditorModel,
        config: Config,
        out: W,
        size_fn: SizeFn,
        channels: RuntimeChannels,
    ) -> Self {
        let RuntimeChannels {
            tx,
            rx,
            source_handles,
            input_task,
            input_shutdown,
        } = channels;
        Self {
            model,
            config,
            translator: KeyTranslator::new(),
            render_engine: RenderEngine::new(),
            out,
            size_fn,
            last_size: (0, 0),
            last_title: String::new(),
            rx,
            tx: Some(tx),
            source_handles,
            input_task,
            input_shutdown,
        }
    }

    pub(crate) async fn run(&mut self) -> Result<()> {
        self.render()?;

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        let mut fatal: Option<anyhow::Error> = None;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Tick => Ok(self.handle_tick()),
                Event::Shutdown => Ok(LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                }),
            };
            match control {
                Ok(LoopControl::Break { reason }) => {
                    shutdown_reason = reason;
                    break;
                }
                Ok(LoopControl::Continue { redraw: true }) => {
                    if let Err(err) = self.render() {
                        shutdown_reason = ShutdownReason::Fatal;
                        fatal = Some(err);
                        break;
                    }
                }
                Ok(LoopControl::Continue { redraw: false }) => {}
                Err(err) => {
                    error!(target: "runtime", %err, cursor = self.model.cursor_index(), "text_store_invariant_broken");
                    shutdown_reason = ShutdownReason::Fatal;
                    fatal = Some(err.into());
                    break;
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_input_event(&mut self, input: InputEvent) -> Result<LoopControl, TextError> {
        match input {
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::CtrlC => {
                trace!(target: "runtime", "ctrl_c");
                dispatch(Action::ForceQuit, &mut self.model)?;
                Ok(LoopControl::Break {
                    reason: ShutdownReason::CtrlC,
                })
            }
            InputEvent::Resize(w, h) => Ok(self.handle_resize(w, h)),
            InputEvent::Paste(text) => self.handle_paste(text),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<LoopControl, TextError> {
        match self.translator.translate(self.model.focus(), key) {
            Some(action) => self.apply_action(action),
            None => {
                trace!(target: "runtime", %key, "unbound_key");
                Ok(LoopControl::Continue { redraw: false })
            }
        }
    }

    /// Pastes go to the text box only, like typed text.
    fn handle_paste(&mut self, text: String) -> Result<LoopControl, TextError> {
        if self.model.focus() != Focus::Text {
            trace!(target: "runtime", len = text.len(), "paste_ignored_menu_focus");
            return Ok(LoopControl::Continue { redraw: false });
        }
        self.apply_action(Action::Paste(text))
    }

    fn apply_action(&mut self, action: Action) -> Result<LoopControl, TextError> {
        let result = dispatch(action, &mut self.model)?;
        if result.quit {
            return Ok(LoopControl::Break {
                reason: ShutdownReason::ActionQuit,
            });
        }
        Ok(LoopControl::Continue {
            redraw: result.dirty,
        })
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        trace!(target: "runtime", width, height, "resize");
        self.apply_geometry((width, height));
        self.render_engine.invalidate();
        LoopControl::Continue { redraw: true }
    }

    fn handle_tick(&mut self) -> LoopControl {
        let expired = self.model.state_mut().tick_ephemeral();
        LoopControl::Continue { redraw: expired }
    }

    /// Re-clamp the scroll margin for a new terminal size.
    fn apply_geometry(&mut self, size: (u16, u16)) {
        self.last_size = size;
        if let Some(margin) = self
            .config
            .recompute_with_context(ConfigContext::from_terminal(size.0, size.1))
        {
            self.model.set_vertical_margin(margin as usize);
        }
    }

    fn render(&mut self) -> Result<()> {
        if let Some(size) = (self.size_fn)()
            && size != self.last_size
        {
            self.apply_geometry(size);
        }
        let (w, h) = self.last_size;
        let title = RenderEngine::window_title(&self.model);
        if title != self.last_title {
            queue!(self.out, SetTitle(&title))?;
            self.last_title = title;
        }
        if let Err(e) = self
            .render_engine
            .render(&mut self.model, w, h, &mut self.out)
        {
            error!(target: "render.engine", ?e, "render_error");
            return Err(e);
        }
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_timeout"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &EditorModel {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers};
    use core_state::{EditorState, Options};
    use core_text::TextStore;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing::dispatcher::Dispatch;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    #[derive(Clone, Default)]
    struct Capture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedEvent {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct FieldCollector {
        fields: Vec<(String, String)>,
    }

    impl Visit for FieldCollector {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for Capture
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut collector = FieldCollector::default();
            event.record(&mut collector);
            self.events.lock().unwrap().push(CapturedEvent {
                target: event.metadata().target().to_string(),
                fields: collector.fields,
            });
        }
    }

    fn fixed_size() -> Option<(u16, u16)> {
        Some((40, 12))
    }

    fn runtime_with(text: &str, events: Vec<Event>) -> EditorRuntime<Vec<u8>> {
        let (tx, rx) = mpsc::channel(64);
        for ev in events {
            tx.try_send(ev).expect("test channel has room");
        }
        let model = EditorModel::new(EditorState::new(
            TextStore::from_text(text),
            Options::default(),
        ));
        let channels = RuntimeChannels {
            tx,
            rx,
            source_handles: Vec::new(),
            input_task: None,
            input_shutdown: None,
        };
        EditorRuntime::new(model, Config::default(), Vec::new(), fixed_size, channels)
    }

    fn key(c: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char(c))))
    }

    fn ctrl(c: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CTRL,
        )))
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::CtrlC.as_str(), "ctrl_c");
        assert_eq!(ShutdownReason::ActionQuit.as_str(), "action_quit");
        assert_eq!(ShutdownReason::ShutdownEvent.as_str(), "shutdown_event");
        assert_eq!(ShutdownReason::ChannelClosed.as_str(), "channel_closed");
        assert_eq!(ShutdownReason::Fatal.to_string(), "fatal");
    }

    #[test]
    fn shutdown_logging_includes_reason_and_stage() {
        let capture = Capture::default();
        let events = capture.events.clone();
        let dispatcher = Dispatch::new(Registry::default().with(capture));

        tracing::dispatcher::with_default(&dispatcher, || {
            log_shutdown_stage(ShutdownReason::ActionQuit, "complete");
        });

        let events = events.lock().unwrap();
        let shutdown_event = events
            .iter()
            .find(|event| event.target == "runtime.shutdown")
            .expect("shutdown log emitted");
        assert!(
            shutdown_event
                .fields
                .iter()
                .any(|(name, value)| name == "reason" && value.contains("action_quit"))
        );
        assert!(
            shutdown_event
                .fields
                .iter()
                .any(|(name, value)| name == "stage" && value.contains("complete"))
        );
    }

    #[tokio::test]
    async fn typing_then_quit_twice_exits() {
        let mut rt = runtime_with(
            "",
            vec![key('h'), key('i'), ctrl('w'), ctrl('w'), key('x')],
        );
        rt.run().await.unwrap();
        // The key after the second Ctrl-W is never processed.
        assert_eq!(rt.model().content(), "hi");
        assert!(rt.model().state().dirty);
    }

    #[tokio::test]
    async fn ctrl_c_exits_with_unsaved_changes() {
        let mut rt = runtime_with(
            "",
            vec![key('a'), Event::Input(InputEvent::CtrlC), key('b')],
        );
        rt.run().await.unwrap();
        assert_eq!(rt.model().content(), "a");
    }

    #[tokio::test]
    async fn paste_and_resize_then_shutdown_event() {
        let mut rt = runtime_with(
            "",
            vec![
                Event::Input(InputEvent::Paste("one\ntwo".to_string())),
                Event::Input(InputEvent::Resize(30, 10)),
                Event::Shutdown,
            ],
        );
        rt.run().await.unwrap();
        assert_eq!(rt.model().content(), "one\ntwo");
        let out = String::from_utf8_lossy(rt.output()).into_owned();
        assert!(out.contains("two"));
        assert!(out.contains("Ln 2, Col 4"));
    }

    #[tokio::test]
    async fn paste_is_ignored_while_menu_has_focus() {
        let alt_f = Event::Input(InputEvent::Key(KeyEvent::new(
            KeyCode::Char('f'),
            KeyModifiers::ALT,
        )));
        let mut rt = runtime_with(
            "",
            vec![
                alt_f,
                Event::Input(InputEvent::Paste("menu".to_string())),
                Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Esc))),
                Event::Input(InputEvent::Paste("text".to_string())),
                Event::Shutdown,
            ],
        );
        rt.run().await.unwrap();
        assert_eq!(rt.model().content(), "text");
        assert_eq!(rt.model().focus(), Focus::Text);
    }

    #[tokio::test]
    async fn tick_clears_expired_message() {
        let mut rt = runtime_with("", vec![Event::Tick, Event::Shutdown]);
        rt.model
            .state_mut()
            .set_ephemeral_for("short", Duration::ZERO);
        rt.run().await.unwrap();
        assert!(rt.model().state().ephemeral_text().is_none());
    }

    #[tokio::test]
    async fn first_frame_sets_window_title() {
        let mut rt = runtime_with("", vec![Event::Shutdown]);
        rt.run().await.unwrap();
        let out = String::from_utf8_lossy(rt.output()).into_owned();
        assert!(out.contains("Untitled - oxpad"));
    }

    #[tokio::test]
    async fn loop_ends_when_channel_closes() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(key('z')).await.unwrap();
        let model = EditorModel::new(EditorState::default());
        let channels = RuntimeChannels {
            tx,
            rx,
            source_handles: Vec::new(),
            input_task: None,
            input_shutdown: None,
        };
        let mut rt = EditorRuntime::new(model, Config::default(), Vec::new(), fixed_size, channels);
        // Closing the receiver side ends `recv` once the queue drains.
        rt.rx.close();
        rt.run().await.unwrap();
        assert_eq!(rt.model().content(), "z");
    }
}
