//! Upload bar: the path prompt while choosing a file, otherwise the pending file.

use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use vidchat_core::Controller;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_upload_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    controller: &Controller,
    theme: &Theme,
) {
    let muted = Style::default().fg(theme.muted);
    let prompting = state.mode == Mode::PathPrompt;

    let line = if prompting {
        Line::from(vec![Span::styled("Path: ", muted), Span::raw(state.path_input.clone())])
    } else {
        match controller.pending_file() {
            Some(file) => {
                let mut spans = vec![
                    Span::raw(file.filename.clone()),
                    Span::styled(
                        format!("  {:.1} MB  {}", file.size() as f64 / 1024.0 / 1024.0, file.content_type),
                        muted,
                    ),
                ];
                if controller.flags().uploading {
                    spans.push(Span::styled("  Uploading...", Style::default().fg(theme.pending)));
                } else {
                    spans.push(Span::styled("  U upload, x clear", muted));
                }
                Line::from(spans)
            }
            None => Line::styled("No file chosen. Press u to choose a video file.", muted),
        }
    };

    let title = if prompting { "Upload (Enter choose, Esc cancel)" } else { "Upload" };
    frame.render_widget(Paragraph::new(line).block(panel_block(title, prompting, theme)), area);

    if prompting {
        let inner = inner_rect(area);
        let typed = u16::try_from(state.path_input.chars().count()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(6).saturating_add(typed);
        frame.set_cursor_position(Position { x: x.min(inner.right().saturating_sub(1)), y: inner.y });
    }
}
