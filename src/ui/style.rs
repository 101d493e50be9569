#[allow(unused_imports)] /// Needed for Stylize in this scope
use ratatui::style::{Style, Stylize};
use ratatui::style::Color;

/// Palette for one of the two display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub link: Color,
    pub highlight: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(0xf9, 0xfa, 0xfb),
            panel: Color::White,
            text: Color::Rgb(0x37, 0x41, 0x51),
            muted: Color::Rgb(0x6b, 0x72, 0x80),
            accent: Color::Rgb(0x00, 0x3f, 0x72),
            user: Color::Rgb(0x00, 0x3f, 0x72),
            assistant: Color::Rgb(0x04, 0x78, 0x57),
            link: Color::Rgb(0x25, 0x63, 0xeb),
            highlight: Color::Rgb(0xb4, 0x53, 0x09),
            error: Color::Rgb(0xb9, 0x1c, 0x1c),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x11, 0x18, 0x27),
            panel: Color::Rgb(0x1f, 0x29, 0x37),
            text: Color::Rgb(0xd1, 0xd5, 0xdb),
            muted: Color::Rgb(0x9c, 0xa3, 0xaf),
            accent: Color::Rgb(0xea, 0xab, 0x00),
            user: Color::Rgb(0xea, 0xab, 0x00),
            assistant: Color::Rgb(0x34, 0xd3, 0x99),
            link: Color::Rgb(0x60, 0xa5, 0xfa),
            highlight: Color::Rgb(0xfb, 0xbf, 0x24),
            error: Color::Rgb(0xf8, 0x71, 0x71),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn panel(&self) -> Style {
        Style::default().fg(self.text).bg(self.panel)
    }
}

pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim().italic() }
}

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}
