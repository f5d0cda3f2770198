//! Keybinding dispatcher for vidchat.
//!
//! Translates key and mouse events into `AppState` changes and controller entry
//! points. Anything that needs I/O comes back as a [`KeyAction`] for the event
//! loop to carry out; this module never touches the network or the disk.
//!
//! A queued notice captures every key until it is dismissed. Otherwise the
//! dispatcher branches on `state.mode`.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use vidchat_core::{ClientResult, Controller, Request};

use crate::app::{AppState, Focus, Mode};

/// What the event loop should do after a key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Run these requests through the dispatcher.
    Dispatch(Vec<Request>),
    /// Read this file and offer it to `Controller::select_file`.
    OpenFile(PathBuf),
}

impl KeyAction {
    fn dispatch(request: Request) -> Self {
        KeyAction::Dispatch(vec![request])
    }
}

/// Turns an entry-point result into an action, reporting failures to the user.
fn outcome(state: &mut AppState, result: ClientResult<Request>) -> KeyAction {
    match result {
        Ok(request) => KeyAction::dispatch(request),
        Err(err) => {
            state.report(err);
            KeyAction::Continue
        }
    }
}

pub fn handle_key(key: KeyEvent, state: &mut AppState, controller: &mut Controller) -> KeyAction {
    if state.current_notice().is_some() {
        return handle_notice(key, state);
    }
    match state.mode {
        Mode::Normal => handle_normal(key, state, controller),
        Mode::Insert => handle_insert(key, state, controller),
        Mode::PathPrompt => handle_path_prompt(key, state),
        Mode::HelpOverlay => handle_help(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState, controller: &mut Controller) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state, controller) {
        return action;
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }

        KeyCode::Enter if state.focus == Focus::Videos => select_highlighted(state, controller),
        KeyCode::Char('a') => match highlighted_or_selected(state, controller) {
            Some(id) => outcome(state, controller.analyze(&id)),
            None => KeyAction::Continue,
        },
        KeyCode::Char('r') => KeyAction::dispatch(controller.refresh_catalog()),
        KeyCode::Char('R') => outcome(state, controller.refresh_selected()),
        KeyCode::Esc => {
            controller.clear_selection();
            state.chat_scroll = 0;
            KeyAction::Continue
        }

        KeyCode::Char('u') => {
            state.path_input.clear();
            state.mode = Mode::PathPrompt;
            KeyAction::Continue
        }
        KeyCode::Char('U') => outcome(state, controller.upload()),
        KeyCode::Char('x') => {
            if let Err(err) = controller.clear_file() {
                state.report(err);
            }
            KeyAction::Continue
        }

        KeyCode::Char('i') => {
            state.focus = Focus::Chat;
            state.mode = Mode::Insert;
            KeyAction::Continue
        }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// j/k move the list cursor or scroll the transcript depending on focus.
fn handle_scroll_key(
    key: KeyEvent,
    state: &mut AppState,
    controller: &Controller,
) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let len = controller.catalog().len();

    match (key.code, state.focus) {
        (KeyCode::Char('j') | KeyCode::Down, Focus::Videos) => state.cursor_down(len),
        (KeyCode::Char('k') | KeyCode::Up, Focus::Videos) => state.cursor_up(),
        (KeyCode::Char('g'), Focus::Videos) if len > 0 => state.list_state.select(Some(0)),
        (KeyCode::Char('G'), Focus::Videos) if len > 0 => state.list_state.select(Some(len - 1)),

        (KeyCode::Char('j') | KeyCode::Down, Focus::Chat) => state.scroll_chat_down(1),
        (KeyCode::Char('k') | KeyCode::Up, Focus::Chat) => state.scroll_chat_up(1),
        (KeyCode::Char('d'), Focus::Chat) if ctrl => state.scroll_chat_down(state.half_page()),
        (KeyCode::Char('u'), Focus::Chat) if ctrl => state.scroll_chat_up(state.half_page()),
        (KeyCode::Char('G'), Focus::Chat) => state.chat_scroll = 0,
        (KeyCode::Char('g'), Focus::Chat) => state.chat_scroll = u16::MAX,
        _ => return None,
    }
    Some(KeyAction::Continue)
}

fn highlighted_id(state: &AppState, controller: &Controller) -> Option<String> {
    let index = state.highlighted()?;
    controller.catalog().videos().get(index).map(|v| v.id.clone())
}

fn highlighted_or_selected(state: &AppState, controller: &Controller) -> Option<String> {
    match state.focus {
        Focus::Videos => highlighted_id(state, controller),
        Focus::Chat => controller.selected_id().map(str::to_owned),
    }
}

fn select_highlighted(state: &mut AppState, controller: &mut Controller) -> KeyAction {
    let Some(id) = highlighted_id(state, controller) else {
        return KeyAction::Continue;
    };
    match controller.select_video(&id) {
        Ok(Some(request)) => {
            state.chat_scroll = 0;
            state.focus = Focus::Chat;
            KeyAction::dispatch(request)
        }
        Ok(None) => {
            state.focus = Focus::Chat;
            KeyAction::Continue
        }
        Err(err) => {
            state.report(err);
            KeyAction::Continue
        }
    }
}

// ---------------------------------------------------------------------------
// Insert mode (chat draft)
// ---------------------------------------------------------------------------

fn handle_insert(key: KeyEvent, state: &mut AppState, controller: &mut Controller) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.chat_scroll = 0;
            outcome(state, controller.send_draft())
        }
        KeyCode::Backspace => {
            controller.pop_draft();
            KeyAction::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            controller.push_draft(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Path prompt
// ---------------------------------------------------------------------------

fn handle_path_prompt(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let path = state.path_input.trim();
            if path.is_empty() {
                return KeyAction::Continue;
            }
            KeyAction::OpenFile(expand_home(path))
        }
        KeyCode::Backspace => {
            state.path_input.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.path_input.push(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// Expands a leading `~/` to `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_notice(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')) {
        state.dismiss_notice();
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the panel under the pointer; the wheel scrolls the
/// focused panel (or the help overlay) by three lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState, catalog_len: usize) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [videos, chat] = state.panel_rects;
            if videos.width > 0 && videos.contains(pos) {
                state.focus = Focus::Videos;
            } else if chat.width > 0 && chat.contains(pos) {
                state.focus = Focus::Chat;
            }
        }
        MouseEventKind::ScrollUp => match (state.mode, state.focus) {
            (Mode::HelpOverlay, _) => state.help_scroll = state.help_scroll.saturating_sub(3),
            (_, Focus::Chat) => state.scroll_chat_up(3),
            (_, Focus::Videos) => state.cursor_up(),
        },
        MouseEventKind::ScrollDown => match (state.mode, state.focus) {
            (Mode::HelpOverlay, _) => state.help_scroll = state.help_scroll.saturating_add(3),
            (_, Focus::Chat) => state.scroll_chat_down(3),
            (_, Focus::Videos) => state.cursor_down(catalog_len),
        },
        _ => {}
    }
    KeyAction::Continue
}
