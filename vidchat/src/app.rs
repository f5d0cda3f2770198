//! Presentation state for vidchat.
//!
//! Everything the backend decides lives in [`vidchat_core::Controller`]; this module
//! only holds what the terminal front end needs on top of it: the active mode, the
//! focused panel, list cursor, scroll offsets, the path prompt buffer, and the notices
//! waiting to be shown.

use std::collections::VecDeque;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use vidchat_core::{ClientError, Notice};

/// Status-bar messages disappear after this many logic ticks (~6 s at 250 ms).
const STATUS_TICKS: u16 = 24;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Editing the chat draft.
    Insert,
    /// Typing the path of a video file to upload.
    PathPrompt,
    HelpOverlay,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Videos,
    Chat,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Videos => Focus::Chat,
            Focus::Chat => Focus::Videos,
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    pub focus: Focus,
    /// Cursor in the video list. Independent of the selected (chatting) video.
    pub list_state: ListState,
    /// Chat lines scrolled up from the bottom; 0 follows new messages.
    pub chat_scroll: u16,
    pub chat_viewport_height: u16,
    pub help_scroll: u16,
    pub path_input: String,
    /// Blocking notices, shown one at a time as a modal.
    pub notices: VecDeque<Notice>,
    /// Transient status-bar message and the ticks it has left.
    pub status: Option<(Notice, u16)>,
    /// Outer rects of `[videos, chat]` from the last frame, for mouse focus.
    pub panel_rects: [Rect; 2],
}

impl AppState {
    /// Queues a blocking notice or shows a non-blocking one in the status bar.
    pub fn push_notice(&mut self, notice: Notice) {
        if notice.is_blocking() {
            self.notices.push_back(notice);
        } else {
            self.status = Some((notice, STATUS_TICKS));
        }
    }

    /// Surfaces an entry-point failure. A refused duplicate action only needs the
    /// status bar; anything else blocks until dismissed.
    pub fn report(&mut self, err: ClientError) {
        let notice = if matches!(err, ClientError::Rejected(_)) {
            Notice::warning(err.detail())
        } else {
            Notice::error(err.detail())
        };
        self.push_notice(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn tick(&mut self) {
        if let Some((_, ticks)) = self.status.as_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.status = None;
            }
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Keeps the list cursor on a valid row after the catalog changed size.
    pub fn clamp_cursor(&mut self, len: usize) {
        let cursor = match (len, self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.list_state.select(cursor);
    }

    pub fn cursor_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn cursor_up(&mut self) {
        let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(prev));
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_viewport_height / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_clamped_to_catalog() {
        let mut state = AppState::default();
        state.clamp_cursor(3);
        assert_eq!(state.highlighted(), Some(0));
        state.list_state.select(Some(2));
        state.clamp_cursor(1);
        assert_eq!(state.highlighted(), Some(0));
        state.clamp_cursor(0);
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn cursor_stops_at_the_ends() {
        let mut state = AppState::default();
        state.cursor_down(2);
        state.cursor_down(2);
        state.cursor_down(2);
        assert_eq!(state.highlighted(), Some(1));
        state.cursor_up();
        state.cursor_up();
        assert_eq!(state.highlighted(), Some(0));
    }

    #[test]
    fn warnings_expire_and_errors_queue() {
        let mut state = AppState::default();
        state.push_notice(Notice::warning("stale"));
        state.push_notice(Notice::error("boom"));
        assert_eq!(state.current_notice().map(|n| n.text.as_str()), Some("boom"));
        for _ in 0..STATUS_TICKS {
            state.tick();
        }
        assert!(state.status.is_none());
        state.dismiss_notice();
        assert!(state.current_notice().is_none());
    }
}
