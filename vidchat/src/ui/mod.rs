//! Rendering for vidchat. [`render`] is the only function called from
//! `terminal.draw()`.

pub mod chat_view;
pub mod help;
pub mod keybindings;
mod layout;
pub mod notice;
pub mod upload_bar;
pub mod video_list;

use ratatui::Frame;
use vidchat_core::Controller;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Panels narrower than this are collapsed and skipped.
const MIN_PANEL_WIDTH: u16 = 3;

/// Draws one frame from the controller snapshot plus presentation state.
///
/// Panel rects and the chat viewport height are written back into `state` for the
/// next mouse click and scroll key.
pub fn render(
    frame: &mut Frame,
    state: &mut AppState,
    controller: &Controller,
    backend_url: &str,
    theme: &Theme,
) {
    state.clamp_cursor(controller.catalog().len());
    let panes = compute_layout(frame.area(), state.focus);
    state.panel_rects = [panes.videos, panes.chat()];

    if panes.videos.width >= MIN_PANEL_WIDTH {
        video_list::render_video_list(frame, panes.videos, state, controller, theme);
    }
    if panes.transcript.width >= MIN_PANEL_WIDTH {
        chat_view::render_analysis(frame, panes.analysis, controller, theme);
        chat_view::render_transcript(frame, panes.transcript, state, controller, theme);
        chat_view::render_input(frame, panes.input, state, controller, theme);
    }
    upload_bar::render_upload_bar(frame, panes.upload, state, controller, theme);
    render_status_bar(frame, panes.status, state, controller, backend_url, theme);

    // Overlays last so they sit on top.
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
    if let Some(notice) = state.current_notice() {
        notice::render_notice(frame, notice, state.notices.len() - 1, theme);
    }
}
