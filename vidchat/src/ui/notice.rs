//! Modal for blocking notices (confirmations and failed actions).

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};
use vidchat_core::{Notice, NoticeLevel};

use crate::theme::Theme;

/// Draws `notice` centered over everything else. `queued` counts the notices
/// waiting behind it.
pub fn render_notice(frame: &mut Frame, notice: &Notice, queued: usize, theme: &Theme) {
    let area = modal_area(frame.area(), &notice.text);
    frame.render_widget(Clear, area);

    let color = theme.notice(notice.level);
    let heading = match notice.level {
        NoticeLevel::Info => " Done ",
        NoticeLevel::Warning => " Warning ",
        NoticeLevel::Error => " Error ",
    };
    let footer = if queued > 0 {
        format!(" Enter to dismiss ({queued} more) ")
    } else {
        " Enter to dismiss ".to_owned()
    };
    let block = Block::bordered()
        .title(Line::styled(heading, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .title_bottom(footer)
        .border_style(Style::default().fg(color));

    frame.render_widget(
        Paragraph::new(Text::raw(notice.text.clone())).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn modal_area(screen: Rect, text: &str) -> Rect {
    let width = screen.width.min(60).max(20);
    let inner_width = usize::from(width.saturating_sub(2)).max(1);
    let rows = u16::try_from(text.chars().count().div_ceil(inner_width)).unwrap_or(u16::MAX);
    let height = rows.saturating_add(2).clamp(3, screen.height.max(3));
    screen.centered(Constraint::Length(width), Constraint::Length(height))
}
