use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use crate::app::App;
use crate::ui::centered_rect;
use crate::ui::style::{spinner, Theme};

pub fn render_connecting(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(50, 25, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner(app.spinner_frame)),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Connecting to your Assistant...", Style::default().fg(theme.text)),
        ]),
        Line::from(""),
        Line::styled("Esc: Quit", Style::default().fg(theme.muted)),
    ]);

    Paragraph::new(text)
        .block(
            Block::bordered()
                .title("Asistente virtual")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent))
                .style(theme.panel()),
        )
        .alignment(Alignment::Center)
        .render(popup, buf);
}
