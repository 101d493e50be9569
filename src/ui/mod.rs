pub mod chat;
pub mod chat_history;
pub mod connecting;
pub mod files;
pub mod setup_error;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Widget},
};
use crate::app::{App, AppMode};
use crate::ui::style::Theme;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = Theme::for_mode(self.dark_mode);
        Block::default().style(theme.base()).render(area, buf);

        match self.mode {
            AppMode::Connecting => connecting::render_connecting(self, &theme, area, buf),
            AppMode::Chat => chat::render_chat(self, &theme, area, buf),
            AppMode::SetupError => setup_error::render_setup_error(self, &theme, area, buf),
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    /// Flattens a buffer into one string per row.
    pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    pub fn buffer_text(buf: &Buffer) -> String {
        buffer_lines(buf).join("\n")
    }
}
