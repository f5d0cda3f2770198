//! Left panel: the video catalog.
//!
//! One row per video in server order: a marker for the video being chatted about,
//! the filename, size in MB, and a colored phase badge. The list cursor is
//! `AppState::list_state` and is independent of the selection.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};
use vidchat_core::{Controller, Video, VideoPhase};

use crate::app::{AppState, Focus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

pub fn render_video_list(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    controller: &Controller,
    theme: &Theme,
) {
    let videos = controller.catalog().videos();
    let title = if videos.is_empty() {
        "Videos".to_owned()
    } else {
        format!("Videos ({})", videos.len())
    };
    let block = panel_block(title, state.focus == Focus::Videos, theme);

    let items: Vec<ListItem> = if videos.is_empty() {
        vec![ListItem::new(Line::styled(
            "No videos yet. Press u to upload one.",
            Style::default().fg(theme.muted),
        ))]
    } else {
        videos
            .iter()
            .map(|video| {
                let phase = controller.phase(&video.id).unwrap_or(VideoPhase::Uploaded);
                let selected = controller.selected_id() == Some(video.id.as_str());
                video_item(video, phase, selected, theme)
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state.list_state);
}

fn video_item(video: &Video, phase: VideoPhase, selected: bool, theme: &Theme) -> ListItem<'static> {
    let marker = if selected {
        Span::styled("● ", Style::default().fg(theme.selected_marker))
    } else {
        Span::raw("  ")
    };
    ListItem::new(Line::from(vec![
        marker,
        Span::raw(video.filename.clone()),
        Span::styled(format!("  {:.1} MB ", video.size_mb()), Style::default().fg(theme.muted)),
        Span::styled(format!("[{}]", phase.label()), Style::default().fg(theme.phase(phase))),
    ]))
}
