//! Help overlay: a centered modal drawn over the panels, `Clear`ed first.

use ratatui::{
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    // Too small for a readable modal.
    if frame.area().width < 40 || frame.area().height < 10 {
        return;
    }
    let area = frame.area().centered(Constraint::Percentage(70), Constraint::Percentage(80));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));
    frame.render_widget(
        Paragraph::new(help_text()).block(block).wrap(Wrap { trim: false }).scroll((help_scroll, 0)),
        area,
    );
}

fn help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Videos"),
        Line::from("  j / k         Move the cursor"),
        Line::from("  Enter         Chat about the highlighted video"),
        Line::from("  a             Analyze the highlighted video"),
        Line::from("  r             Refresh the video list"),
        Line::from("  R             Re-fetch the selected video"),
        Line::from("  Esc           Deselect the current video"),
        Line::from(""),
        Line::from("Upload"),
        Line::from("  u             Choose a video file by path"),
        Line::from("  U             Upload the chosen file (analysis starts automatically)"),
        Line::from("  x             Forget the chosen file"),
        Line::from(""),
        Line::from("Chat"),
        Line::from("  i             Edit the message"),
        Line::from("  Enter         Send (while editing)"),
        Line::from("  Esc           Stop editing, keep the draft"),
        Line::from("  j / k         Scroll the transcript (chat focused)"),
        Line::from("  Ctrl-d / u    Scroll half a page"),
        Line::from(""),
        Line::from("General"),
        Line::from("  Tab           Switch focus between videos and chat"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q             Quit"),
    ])
}
