//! oxpad entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{OpenFileResult, open_file};
use core_config::{Config, ConfigContext, load_from};
use core_events::{EVENT_CHANNEL_CAP, EventSourceRegistry, TickEventSource};
use core_model::EditorModel;
use core_render::APP_NAME;
use core_state::{EditorState, LineEnding, Options};
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_text::TextStore;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;

use runtime::{EditorRuntime, RuntimeChannels};

const LOG_FILE: &str = "oxpad.log";
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// CLI arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "oxpad", version, about = "A small notepad for the terminal")]
struct Args {
    /// File to open. A path that does not exist yet is created on first save.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `oxpad.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Start with word wrap off regardless of configuration.
    #[arg(long = "no-wrap")]
    pub no_wrap: bool,
}

struct EditorBootstrap {
    model: EditorModel,
    config: Config,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Document options for new documents, from configuration.
fn options_from_config(config: &Config) -> Options {
    let file = &config.file.file;
    let line_ending = LineEnding::from_name(&file.line_ending).unwrap_or_else(|| {
        warn!(target: "config", value = %file.line_ending, "unknown_line_ending_using_default");
        LineEnding::default()
    });
    Options {
        line_ending,
        encoding: file.encoding.clone(),
        word_wrap: config.file.view.word_wrap,
    }
}

/// Build the model: configured options, then the file named on the command
/// line (if any).
fn load_editor_model(args: &Args, config: &Config) -> EditorModel {
    let mut options = options_from_config(config);
    if args.no_wrap {
        options.word_wrap = false;
    }
    let mut state = EditorState::new(TextStore::new(), options);
    state.ephemeral_ttl = config.message_ttl();
    if let Some(path) = args.path.as_deref() {
        match open_file(path) {
            OpenFileResult::Success(opened) => opened.apply(&mut state),
            OpenFileResult::Error => state.set_ephemeral("Open failed"),
        }
    }
    let mut model = EditorModel::new(state);
    model.set_vertical_margin(config.effective_vertical_margin as usize);
    model
}

fn bootstrap(args: &Args, size: Option<(u16, u16)>) -> Result<EditorBootstrap> {
    let mut config = load_from(args.config.clone())?;
    if let Some((w, h)) = size {
        config.apply_context(ConfigContext::from_terminal(w, h));
    }
    let model = load_editor_model(args, &config);

    let path_str = args.path.as_ref().map(|p| p.to_string_lossy().to_string());
    info!(
        target: "runtime.startup",
        document = model.state().display_name().as_str(),
        path = path_str.as_deref(),
        chars = model.state().store.len(),
        config_override = args.config.is_some(),
        word_wrap = model.state().options.word_wrap,
        effective_margin = config.effective_vertical_margin,
        "bootstrap_complete"
    );
    Ok(EditorBootstrap { model, config })
}

fn terminal_size() -> Option<(u16, u16)> {
    crossterm::terminal::size().ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut backend = CrosstermBackend::new();
    let EditorBootstrap { model, config } = bootstrap(&args, backend.size().ok())?;

    backend.set_title(APP_NAME)?;
    let _terminal = backend.enter_guard()?;

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(TICK_INTERVAL));
    let source_handles = registry.spawn_all(&tx);

    let channels = RuntimeChannels {
        tx,
        rx,
        source_handles,
        input_task: Some(input_task),
        input_shutdown: Some(input_shutdown),
    };
    let mut runtime = EditorRuntime::new(model, config, std::io::stdout(), terminal_size, channels);
    runtime.run().await
}
