use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};
use crate::app::App;
use crate::ui::{chat_history, files};
use crate::ui::style::{dim_unless_focused, spinner, Theme};

pub fn render_chat(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let error = app.session.error();
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                   // Title
            Constraint::Min(1),                                      // Chat history + files
            Constraint::Length(3),                                   // Input box
            Constraint::Length(if error.is_some() { 3 } else { 0 }), // Error
            Constraint::Length(3),                                   // Help
        ])
        .split(area);

    render_title(app, theme, main_layout[0], buf);

    if app.files.is_visible() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Percentage(30)])
            .split(main_layout[1]);
        chat_history::render_chat_history(app, theme, body[0], buf);
        files::render_files_panel(app, theme, body[1], buf);
    } else {
        chat_history::render_chat_history(app, theme, main_layout[1], buf);
    }

    if let Some(error) = error {
        Paragraph::new(error.to_string())
            .block(
                Block::bordered()
                    .title("Error")
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.error)),
            )
            .fg(theme.error)
            .wrap(Wrap { trim: true })
            .render(main_layout[3], buf);
    }

    render_input(app, theme, main_layout[2], buf);

    let files_hint = if app.files.is_visible() { "F2: Hide files" } else { "F2: Show files" };
    let help = format!(
        "Enter: Send • ↑↓/PgUp/PgDn: Scroll • {} • Ctrl+D: Dark mode • Esc: Quit",
        files_hint
    );
    Paragraph::new(help)
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted)),
        )
        .fg(theme.muted)
        .alignment(Alignment::Center)
        .render(main_layout[4], buf);
}

fn render_title(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let mode = if app.dark_mode { "☾ dark" } else { "☀ light" };
    let title = Line::from(vec![
        Span::styled("Asistente virtual", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  ·  {}", app.assistant_name), Style::default().fg(theme.text)),
        Span::styled(format!("  ·  {}", mode), Style::default().fg(theme.muted)),
    ]);

    Paragraph::new(title)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent)),
        )
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_input(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let streaming = app.session.is_streaming();
    let (title, text) = if streaming {
        (
            format!("{} Streaming...", spinner(app.spinner_frame)),
            format!("> {}", app.session.input()),
        )
    } else {
        ("Type your message".to_string(), format!("> {}▏", app.session.input()))
    };

    Paragraph::new(text)
        .block(
            Block::bordered()
                .title(title)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(dim_unless_focused(!streaming, Style::default().fg(theme.text)))
        .render(area, buf);
}
