//! Right column: analysis of the selected video, the chat transcript, and the
//! draft input line.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};
use vidchat_core::{Controller, Turn, VideoStatus};

use crate::app::{AppState, Focus, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_analysis(frame: &mut Frame, area: Rect, controller: &Controller, theme: &Theme) {
    let muted = Style::default().fg(theme.muted);
    let (title, body) = match controller.selected() {
        None => ("Analysis".to_owned(), Text::styled("No video selected.", muted)),
        Some(video) if controller.is_analyzing(&video.id) => (
            format!("Analysis: {}", video.filename),
            Text::styled("Analyzing...", Style::default().fg(theme.pending)),
        ),
        Some(video) => {
            let body = match &video.analysis {
                Some(analysis) => Text::raw(analysis.display_text()),
                None if video.status == VideoStatus::Failed => Text::styled(
                    "Analysis failed on the server. Press a to try again.",
                    Style::default().fg(theme.notice_error),
                ),
                None => Text::styled("Not analyzed yet. Press a to analyze.", muted),
            };
            (format!("Analysis: {}", video.filename), body)
        }
    };
    frame.render_widget(
        Paragraph::new(body).block(panel_block(title, false, theme)).wrap(Wrap { trim: false }),
        area,
    );
}

/// Builds the transcript lines, oldest first, followed by the pending indicator.
pub fn transcript_lines(controller: &Controller, theme: &Theme) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme.muted);
    let Some(video) = controller.selected() else {
        return vec![Line::styled("Select a video to start chatting.", muted)];
    };
    let session = controller.session();

    let mut lines = Vec::new();
    if session.is_history_loading() {
        lines.push(Line::styled("Loading history...", muted));
    }
    if video.status != VideoStatus::Analyzed {
        lines.push(Line::styled(
            "Video needs to be analyzed before you can chat about it.",
            muted,
        ));
    }
    for turn in session.turns() {
        push_turn(&mut lines, turn, theme);
    }
    if session.is_awaiting_reply() {
        lines.push(Line::styled("AI is thinking...", Style::default().fg(theme.pending)));
    }
    lines
}

fn push_turn(lines: &mut Vec<Line<'static>>, turn: &Turn, theme: &Theme) {
    let label = |text: &'static str, color| {
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    for (i, text) in turn.user_message.lines().enumerate() {
        let prefix = if i == 0 { label("You: ", theme.user_message) } else { Span::raw("     ") };
        lines.push(Line::from(vec![prefix, Span::raw(text.to_owned())]));
    }
    for (i, text) in turn.ai_response.lines().enumerate() {
        let prefix = if i == 0 { label("AI:  ", theme.ai_message) } else { Span::raw("     ") };
        lines.push(Line::from(vec![prefix, Span::raw(text.to_owned())]));
    }
    if let Some(ts) = turn.timestamp {
        lines.push(Line::styled(
            ts.format("%Y-%m-%d %H:%M UTC").to_string(),
            Style::default().fg(theme.timestamp),
        ));
    }
    lines.push(Line::raw(""));
}

/// Rows `lines` occupy when wrapped at `width` (approximate for word wrapping).
pub fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let rows: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Renders the transcript pinned to the bottom, offset by `state.chat_scroll`.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    controller: &Controller,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    state.chat_viewport_height = inner.height;

    let lines = transcript_lines(controller, theme);
    let total = wrapped_height(&lines, inner.width);
    let max_scroll = total.saturating_sub(inner.height);
    state.chat_scroll = state.chat_scroll.min(max_scroll);
    let top = max_scroll - state.chat_scroll;

    let title = match controller.session().session_id() {
        Some(session) => format!("Chat (session {session})"),
        None => "Chat".to_owned(),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel_block(title, state.focus == Focus::Chat, theme))
            .wrap(Wrap { trim: false })
            .scroll((top, 0)),
        area,
    );
}

/// Draft input line. The cursor is shown only while editing.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    controller: &Controller,
    theme: &Theme,
) {
    let editing = state.mode == Mode::Insert;
    let draft = controller.session().draft();
    let title = if editing { "Message (Enter send, Esc done)" } else { "Message (i to type)" };

    // Keep the tail of a long draft visible.
    let inner = inner_rect(area);
    let visible: String = {
        let skip = draft.chars().count().saturating_sub(usize::from(inner.width.saturating_sub(1)));
        draft.chars().skip(skip).collect()
    };
    let body = if draft.is_empty() && !editing {
        Line::styled("Ask something about the selected video", Style::default().fg(theme.muted))
    } else {
        Line::raw(visible.clone())
    };
    frame.render_widget(Paragraph::new(body).block(panel_block(title, editing, theme)), area);

    if editing && inner.width > 0 {
        let x = inner.x + u16::try_from(visible.chars().count()).unwrap_or(inner.width);
        frame.set_cursor_position(Position { x: x.min(inner.right().saturating_sub(1)), y: inner.y });
    }
}
