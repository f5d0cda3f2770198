//! Color themes.
//!
//! `dark` sticks to the ANSI 16 palette and works everywhere; `catppuccin-mocha`
//! needs a truecolor terminal.

use ratatui::style::Color;
use tracing::warn;
use vidchat_core::{NoticeLevel, VideoPhase};

#[derive(Debug, Clone)]
pub struct Theme {
    pub border_active: Color,
    pub border_inactive: Color,

    // Video list phase badges
    pub phase_uploaded: Color,
    pub phase_analyzing: Color,
    pub phase_analyzed: Color,
    pub phase_failed: Color,
    /// Marker on the selected (chatting) video.
    pub selected_marker: Color,

    // Chat transcript
    pub user_message: Color,
    pub ai_message: Color,
    pub timestamp: Color,
    pub pending: Color,

    // Notices
    pub notice_info: Color,
    pub notice_warning: Color,
    pub notice_error: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub status_mode_prompt: Color,
    pub online: Color,
    pub offline: Color,

    pub muted: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            phase_uploaded: Color::Blue,
            phase_analyzing: Color::Yellow,
            phase_analyzed: Color::Green,
            phase_failed: Color::Red,
            selected_marker: Color::Cyan,

            user_message: Color::Cyan,
            ai_message: Color::Reset,
            timestamp: Color::DarkGray,
            pending: Color::Yellow,

            notice_info: Color::Green,
            notice_warning: Color::Yellow,
            notice_error: Color::Red,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_mode_prompt: Color::Magenta,
            online: Color::Green,
            offline: Color::Red,

            muted: Color::DarkGray,
        }
    }

    /// Palette: <https://github.com/catppuccin/catppuccin>, Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let sky = Color::Rgb(137, 220, 235); // #89dceb
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            phase_uploaded: blue,
            phase_analyzing: peach,
            phase_analyzed: green,
            phase_failed: red,
            selected_marker: lavender,

            user_message: sky,
            ai_message: text,
            timestamp: overlay1,
            pending: yellow,

            notice_info: green,
            notice_warning: yellow,
            notice_error: red,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_mode_prompt: mauve,
            online: green,
            offline: red,

            muted: overlay1,
        }
    }

    /// Unknown names fall back to `dark` so a config typo never blocks startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to dark");
                Self::dark()
            }
        }
    }

    pub fn phase(&self, phase: VideoPhase) -> Color {
        match phase {
            VideoPhase::Uploaded => self.phase_uploaded,
            VideoPhase::Analyzing => self.phase_analyzing,
            VideoPhase::Analyzed => self.phase_analyzed,
            VideoPhase::Failed => self.phase_failed,
        }
    }

    pub fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.notice_info,
            NoticeLevel::Warning => self.notice_warning,
            NoticeLevel::Error => self.notice_error,
        }
    }
}
