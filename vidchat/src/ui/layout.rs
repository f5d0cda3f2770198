//! Layout arithmetic and the shared panel chrome.
//!
//! Recomputed on every draw from the live terminal size; never store the rects
//! across frames (except the copy in `AppState::panel_rects` used for mouse hits).
//!
//! ```text
//! ┌ Videos ──────┐┌ Analysis ─────────────────────┐
//! │              ││                               │
//! │              │├ Chat ─────────────────────────┤
//! │              ││                               │
//! │              │├ Message ──────────────────────┤
//! └──────────────┘└───────────────────────────────┘
//! ┌ Upload ────────────────────────────────────────┐
//! └────────────────────────────────────────────────┘
//!  NORMAL  ● online  http://localhost:8001   ...
//! ```
//!
//! Below 80 columns only the focused panel is shown.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};
use vidchat_core::{Controller, PendingFlags};

use crate::app::{AppState, Focus, Mode};
use crate::theme::Theme;

/// Width below which the two main panels stop sharing the screen.
pub const NARROW_WIDTH: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub videos: Rect,
    pub analysis: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub upload: Rect,
    pub status: Rect,
}

impl Panes {
    /// Whole chat column, used for mouse hit-testing.
    pub fn chat(&self) -> Rect {
        self.analysis.union(self.transcript).union(self.input)
    }
}

pub fn compute_layout(area: Rect, focus: Focus) -> Panes {
    let [main, upload, status] = area.layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ]));

    let columns = if area.width >= NARROW_WIDTH {
        [Constraint::Percentage(35), Constraint::Percentage(65)]
    } else if focus == Focus::Videos {
        [Constraint::Fill(1), Constraint::Length(0)]
    } else {
        [Constraint::Length(0), Constraint::Fill(1)]
    };
    let [videos, chat] =
        main.layout(&Layout::horizontal(columns).spacing(Spacing::Overlap(1)));

    // Analysis gets a third of the column but never crowds out the transcript.
    let analysis_height = (chat.height / 3).clamp(3, 12);
    let [analysis, transcript, input] = chat.layout(
        &Layout::vertical([
            Constraint::Length(analysis_height),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .spacing(Spacing::Overlap(1)),
    );

    Panes { videos, analysis, transcript, input, upload, status }
}

/// Rect inside a panel's 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block; thick and highlighted when focused. Fuzzy merging keeps the
/// junctions right where thick and plain borders meet.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let (border_type, color) = if is_focused {
        (BorderType::Thick, theme.border_active)
    } else {
        (BorderType::Plain, theme.border_inactive)
    };
    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Labels for whichever operations are outstanding.
pub fn pending_labels(flags: PendingFlags) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if flags.uploading {
        labels.push("Uploading...");
    }
    if flags.analyzing {
        labels.push("Analyzing...");
    }
    if flags.awaiting_reply {
        labels.push("AI is thinking...");
    }
    labels
}

/// One-row status bar: mode, backend health, pending work, and the latest
/// non-blocking message.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    controller: &Controller,
    backend_url: &str,
    theme: &Theme,
) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::PathPrompt => (" UPLOAD ", theme.status_mode_prompt),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };
    let (health_text, health_fg) = match controller.server_online() {
        Some(true) => (" ● online ", theme.online),
        Some(false) => (" ● offline ", theme.offline),
        None => (" ○ connecting ", theme.muted),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::styled(health_text, Style::default().fg(health_fg)),
        Span::raw(format!("{backend_url}  ")),
    ];
    for label in pending_labels(controller.flags()) {
        spans.push(Span::styled(format!("{label}  "), Style::default().fg(theme.pending)));
    }
    if let Some((notice, _)) = &state.status {
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(theme.notice(notice.level))));
    } else {
        spans.push(Span::styled("? help", Style::default().fg(theme.muted)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminal_shows_both_panels() {
        let panes = compute_layout(Rect::new(0, 0, 120, 40), Focus::Videos);
        assert!(panes.videos.width > 0);
        assert!(panes.transcript.width > 0);
        assert_eq!(panes.status.height, 1);
        assert_eq!(panes.upload.height, 3);
        assert_eq!(panes.input.height, 3);
    }

    #[test]
    fn narrow_terminal_shows_only_the_focused_panel() {
        let area = Rect::new(0, 0, 60, 30);
        let panes = compute_layout(area, Focus::Chat);
        assert!(panes.videos.width <= 1);
        assert!(panes.transcript.width >= 59);

        let panes = compute_layout(area, Focus::Videos);
        assert!(panes.videos.width >= 59);
        assert!(panes.transcript.width <= 1);
    }

    #[test]
    fn pending_labels_follow_flags() {
        let flags = PendingFlags { uploading: true, analyzing: false, awaiting_reply: true };
        assert_eq!(pending_labels(flags), ["Uploading...", "AI is thinking..."]);
        assert!(pending_labels(PendingFlags::default()).is_empty());
    }
}
