use crate::key_map::{map_key_code, map_mods};
use crate::log_paste;
use core_events::{Event, InputEvent, KeyEvent};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods,
};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, trace, warn};

/// Asks a running input pump to stop. Signalling before the pump starts
/// waiting is not lost.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn signal(&self) {
        self.notify.notify_one();
    }

    async fn requested(&self) {
        self.notify.notified().await;
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let shutdown = AsyncInputShutdown::new();
    let pump = InputPump {
        sender,
        stream: EventStream::new(),
        shutdown: shutdown.clone(),
    };
    (task::spawn(pump.run()), shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    Signalled,
    ReceiverGone,
    StreamEnded,
    StreamError,
}

impl StopReason {
    fn as_str(&self) -> &'static str {
        match self {
            StopReason::Signalled => "shutdown_signal",
            StopReason::ReceiverGone => "channel_closed",
            StopReason::StreamEnded => "stream_ended",
            StopReason::StreamError => "stream_error",
        }
    }
}

/// Map one terminal event to editor input. Key releases, keys without a
/// binding-relevant code, focus and mouse events yield `None`.
fn normalize(event: CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => normalize_key(key),
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            Some(InputEvent::Resize(w, h))
        }
        CEvent::Paste(data) => {
            log_paste(&data);
            Some(InputEvent::Paste(data))
        }
        _ => None,
    }
}

fn normalize_key(key: CKeyEvent) -> Option<InputEvent> {
    if !matches!(key.kind, CKind::Press | CKind::Repeat) {
        return None;
    }
    if key.code == CKeyCode::Char('c') && key.modifiers.contains(CMods::CONTROL) {
        return Some(InputEvent::CtrlC);
    }
    let Some(code) = map_key_code(&key.code) else {
        trace!(target: "input.event", code = ?key.code, "unmapped_key");
        return None;
    };
    let mods = map_mods(key.modifiers);
    trace!(target: "input.event", kind = "keypress", mods = ?mods);
    Some(InputEvent::Key(KeyEvent::new(code, mods)))
}

/// Reads terminal events and forwards the normalized ones in order.
struct InputPump<S> {
    sender: Sender<Event>,
    stream: S,
    shutdown: AsyncInputShutdown,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.requested() => break StopReason::Signalled,
                next = self.stream.next() => next,
            };
            let event = match next {
                None => break StopReason::StreamEnded,
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break StopReason::StreamError;
                }
                Some(Ok(event)) => event,
            };
            if let Some(input) = normalize(event)
                && self.sender.send(Event::Input(input)).await.is_err()
            {
                break StopReason::ReceiverGone;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers};
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;
    use tracing::Subscriber;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    #[derive(Clone, Default)]
    struct StopLog {
        reasons: Arc<Mutex<Vec<String>>>,
    }

    struct ReasonField(Option<String>);

    impl Visit for ReasonField {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "reason" {
                self.0 = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for StopLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut field = ReasonField(None);
            event.record(&mut field);
            if let Some(reason) = field.0 {
                self.reasons.lock().unwrap().push(reason);
            }
        }
    }

    fn press(code: CKeyCode, mods: CMods) -> CEvent {
        CEvent::Key(CKeyEvent::new(code, mods))
    }

    async fn pump_all(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        InputPump {
            sender: tx,
            stream: tokio_stream::iter(events.into_iter().map(Ok)),
            shutdown: AsyncInputShutdown::new(),
        }
        .run()
        .await;
        let mut out = Vec::new();
        while let Some(evt) = rx.recv().await {
            out.push(evt);
        }
        out
    }

    #[test]
    fn normalize_keeps_modifiers_and_surfaces_ctrl_c() {
        assert_eq!(
            normalize(press(CKeyCode::Char('s'), CMods::CONTROL)),
            Some(InputEvent::Key(KeyEvent::new(
                KeyCode::Char('s'),
                KeyModifiers::CTRL
            )))
        );
        assert_eq!(
            normalize(press(CKeyCode::Char('c'), CMods::CONTROL)),
            Some(InputEvent::CtrlC)
        );
        assert_eq!(normalize(CEvent::FocusGained), None);
        assert_eq!(normalize(press(CKeyCode::F(1), CMods::NONE)), None);
    }

    #[test]
    fn normalize_drops_releases_but_keeps_repeats() {
        let mut release = CKeyEvent::new(CKeyCode::Char('x'), CMods::NONE);
        release.kind = CKind::Release;
        let mut repeat = CKeyEvent::new(CKeyCode::Right, CMods::NONE);
        repeat.kind = CKind::Repeat;
        assert_eq!(normalize(CEvent::Key(release)), None);
        assert_eq!(
            normalize(CEvent::Key(repeat)),
            Some(InputEvent::Key(KeyEvent::plain(KeyCode::Right)))
        );
    }

    #[tokio::test]
    async fn forwards_in_order_until_stream_ends() {
        let outputs = pump_all(vec![
            press(CKeyCode::Char('a'), CMods::NONE),
            CEvent::FocusLost,
            CEvent::Resize(120, 48),
            CEvent::Paste("pasted\ntext".to_string()),
            press(CKeyCode::Char('f'), CMods::ALT),
        ])
        .await;
        assert_eq!(
            outputs,
            vec![
                Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char('a')))),
                Event::Input(InputEvent::Resize(120, 48)),
                Event::Input(InputEvent::Paste("pasted\ntext".to_string())),
                Event::Input(InputEvent::Key(KeyEvent::new(
                    KeyCode::Char('f'),
                    KeyModifiers::ALT
                ))),
            ]
        );
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let pump = InputPump {
            sender: tx,
            stream: tokio_stream::iter(vec![Ok(CEvent::Resize(10, 10))]),
            shutdown: AsyncInputShutdown::new(),
        };
        timeout(Duration::from_millis(50), pump.run())
            .await
            .expect("pump should stop on a closed channel");
    }

    #[tokio::test]
    async fn signal_stops_an_idle_pump_and_logs_the_reason() {
        let log = StopLog::default();
        let reasons = log.reasons.clone();
        let dispatch = tracing::Dispatch::new(Registry::default().with(log));
        let _guard = tracing::dispatcher::set_default(&dispatch);

        let (tx, mut rx) = mpsc::channel(1);
        let (_idle_tx, idle_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let shutdown = AsyncInputShutdown::new();
        let pump = InputPump {
            sender: tx,
            stream: UnboundedReceiverStream::new(idle_rx),
            shutdown: shutdown.clone(),
        };
        shutdown.signal();

        timeout(Duration::from_millis(50), pump.run())
            .await
            .expect("signalled pump should stop promptly");
        assert!(rx.recv().await.is_none());
        assert_eq!(*reasons.lock().unwrap(), vec!["shutdown_signal".to_string()]);
    }
}
