//! vidchat: terminal client for the video analysis and chat backend.
//!
//! # Startup sequence
//!
//! 1. Load config (defaults when missing) and apply `VIDCHAT_BACKEND_URL`.
//! 2. Start file logging; keep the guard until exit.
//! 3. Build the HTTP gateway. Fails before the terminal is touched.
//! 4. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 5. Spawn the input/timer task, subscribe to controller changes, and dispatch the
//!    startup requests (health probe and first catalog fetch).
//!
//! The loop below exits only via `break`, so `restore_tui()` always runs after it.

mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use vidchat_core::media::read_upload;
use vidchat_core::{Controller, Dispatcher, Gateway, HttpGateway, StateChange};

use crate::app::AppState;
use crate::config::{config_path, Config, BACKEND_URL_ENV};
use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

/// Reads the file on a background task and reports back as `FileLoaded`.
fn open_file(path: PathBuf, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = read_upload(&path)
            .await
            .map_err(|e| format!("Could not read {}: {e}", path.display()));
        let _ = tx.send(AppEvent::FileLoaded(result));
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path();
    let (config, config_error) = match Config::load(&path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (Config::default(), Some(e)),
    };
    let config = config.with_env_override(std::env::var(BACKEND_URL_ENV).ok());

    let _log_guard = logging::init(&config.log_dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), backend = %config.api_base_url, "vidchat starting");
    if let Some(e) = config_error {
        warn!(error = ?e, "ignoring malformed config, using defaults");
    }

    let theme = theme::Theme::from_name(&config.theme);
    let http = HttpGateway::new(config.gateway()).context("building HTTP client")?;
    let backend_url = http.base_url().to_owned();
    let gateway: Arc<dyn Gateway> = Arc::new(http);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx.clone();
    let mut rx = handler.rx;

    let mut state = AppState::default();
    let mut controller = Controller::new();
    let mut changes = controller.subscribe();
    let dispatcher: Dispatcher<AppEvent> = Dispatcher::new(gateway, tx.clone());
    dispatcher.dispatch_all(controller.start());

    let result: anyhow::Result<()> = 'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when nothing else happens.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            Some(change) = changes.recv() => match change {
                StateChange::Notice(notice) => state.push_notice(notice),
                StateChange::Catalog => state.clamp_cursor(controller.catalog().len()),
                StateChange::Selection
                | StateChange::Conversation
                | StateChange::Draft
                | StateChange::Flags
                | StateChange::Health => {}
            },
            maybe_event = rx.recv() => match maybe_event {
                Some(AppEvent::Render) => {
                    if let Err(e) = terminal.draw(|frame| {
                        ui::render(frame, &mut state, &controller, &backend_url, &theme)
                    }) {
                        break 'event_loop Err(e).context("drawing frame");
                    }
                }
                Some(AppEvent::Key(key)) => match handle_key(key, &mut state, &mut controller) {
                    KeyAction::Quit => break 'event_loop Ok(()),
                    KeyAction::Dispatch(requests) => dispatcher.dispatch_all(requests),
                    KeyAction::OpenFile(path) => open_file(path, tx.clone()),
                    KeyAction::Continue => {}
                },
                Some(AppEvent::Mouse(mouse)) => {
                    handle_mouse(mouse, &mut state, controller.catalog().len());
                }
                Some(AppEvent::Completion(completion)) => {
                    let follow_ups = controller.apply(*completion);
                    dispatcher.dispatch_all(follow_ups);
                }
                Some(AppEvent::FileLoaded(Ok(upload))) => {
                    info!(filename = %upload.filename, size = upload.size(), "file chosen");
                    if let Err(err) = controller.select_file(upload) {
                        state.report(err);
                    }
                }
                Some(AppEvent::FileLoaded(Err(message))) => {
                    warn!(%message, "file read failed");
                    state.push_notice(vidchat_core::Notice::error(message));
                }
                Some(AppEvent::Tick) => state.tick(),
                // ratatui picks up the new size on the next draw.
                Some(AppEvent::Resize(_, _)) => {}
                None => break 'event_loop Ok(()),
            },
        }
        if term_flag.load(Ordering::Relaxed) {
            info!("SIGTERM received");
            break 'event_loop Ok(());
        }
    };

    tui::restore_tui().context("restoring terminal")?;
    info!("vidchat exiting");
    result
}
