use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};
use crate::app::App;
use crate::modules::chat::{Message, Role};
use crate::ui::style::{spinner, Theme};

pub fn render_chat_history(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let transcript = app.session.transcript();
    let content = if transcript.is_empty() {
        welcome_text(app, theme)
    } else {
        let mut lines = Vec::new();
        for message in &transcript.messages {
            let is_open = transcript.open_message == Some(message.id);
            lines.extend(message_lines(message, is_open, app, theme));
            lines.push(Line::from(""));
        }
        Text::from(lines)
    };

    let block = Block::bordered()
        .title("Chat History (↑↓ to scroll, End to follow)")
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.muted))
        .style(theme.panel());
    let inner = block.inner(area);

    let paragraph = Paragraph::new(content).wrap(Wrap { trim: false });

    // Bottom-anchored: offset 0 shows the newest lines. Rows are counted by
    // the same word wrapper that renders them.
    let total = paragraph.line_count(inner.width);
    let max_offset = total.saturating_sub(inner.height as usize);
    app.record_chat_max_scroll(max_offset);
    let offset = app.session.scroll_offset().min(max_offset);
    let top = max_offset - offset;

    block.render(area, buf);
    paragraph
        .scroll((top.min(u16::MAX as usize) as u16, 0))
        .render(inner, buf);
}

fn welcome_text(app: &App, theme: &Theme) -> Text<'static> {
    let name = if app.assistant_name.is_empty() {
        "your Assistant".to_string()
    } else {
        app.assistant_name.clone()
    };
    Text::from(vec![
        Line::styled(format!("Welcome! You are chatting with {}.", name), Style::default().fg(theme.text)),
        Line::from(""),
        Line::styled("Ask a question about the documents uploaded to it.", Style::default().fg(theme.muted)),
        Line::styled("Answers stream in as they are written.", Style::default().fg(theme.muted)),
    ])
}

fn message_lines(message: &Message, is_open: bool, app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let (prefix, color) = match message.role {
        Role::User => ("You: ", theme.user),
        Role::Assistant => ("Assistant: ", theme.assistant),
    };
    let text_style = Style::default().fg(theme.text);

    let mut lines = Vec::new();
    let mut content_lines = message.content.lines();
    let first = match content_lines.next() {
        Some(line) => Span::styled(line.to_string(), text_style),
        None if is_open => Span::styled(
            format!("{} thinking...", spinner(app.spinner_frame)),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        ),
        None => Span::raw(""),
    };
    lines.push(Line::from(vec![
        Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        first,
    ]));

    for line in content_lines {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(line.to_string(), text_style),
        ]));
    }

    if is_open && !message.content.is_empty() {
        lines.push(Line::styled(
            format!("    {}", spinner(app.spinner_frame)),
            Style::default().fg(theme.muted),
        ));
    }

    if app.show_citations() {
        let references = message.references.as_deref().unwrap_or_default();
        if !is_open && !references.is_empty() {
            lines.push(Line::styled("    References:", Style::default().fg(theme.muted)));
            for reference in references {
                lines.push(Line::from(vec![
                    Span::raw("      📄 "),
                    Span::styled(
                        reference.name.clone(),
                        Style::default().fg(theme.link).add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests_support::test_app;
    use crate::modules::chat::TranscriptSink;
    use crate::ui::test_support::buffer_text;

    fn finished_reply(reply: &str) -> App {
        let mut app = test_app();
        app.session.input_char('q');
        app.session.submit().unwrap();
        app.session.update_last_assistant_content(reply);
        app.session.finish_stream(Ok(()));
        app
    }

    fn draw_history(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        render_chat_history(app, &Theme::light(), area, &mut buf);
        buffer_text(&buf)
    }

    #[tokio::test]
    async fn test_long_reply_keeps_last_line_in_view() {
        let reply = format!("{}\nLASTLINE", "aaaaaaaaaaaaaaaaaaaa ".repeat(30));
        let app = finished_reply(&reply);

        let screen = draw_history(&app, 40, 14);

        assert!(screen.contains("LASTLINE"), "newest line scrolled out of view:\n{}", screen);
    }

    #[tokio::test]
    async fn test_scrolled_up_view_hides_last_line() {
        let reply = format!("FIRSTLINE {}\nLASTLINE", "aaaaaaaaaaaaaaaaaaaa ".repeat(30));
        let mut app = finished_reply(&reply);
        for _ in 0..100 {
            app.session.scroll_up();
        }

        let screen = draw_history(&app, 40, 14);

        assert!(screen.contains("FIRSTLINE"));
        assert!(!screen.contains("LASTLINE"));
    }
}
