use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};
use crate::app::{App, CONNECTION_ERROR};
use crate::ui::centered_rect;
use crate::ui::style::Theme;

pub const CONSOLE_URL: &str = "https://app.pinecone.io";

/// Shown when the assistant is missing or the existence check failed.
pub fn render_setup_error(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(70, 60, area);
    let error = app.setup_error.as_deref().unwrap_or(CONNECTION_ERROR);
    let bold = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(theme.text);

    let text = Text::from(vec![
        Line::styled(error.to_string(), Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::styled("To resolve this issue:", bold),
        Line::from(vec![
            Span::styled("  1. Create a Pinecone Assistant at ", text_style),
            Span::styled(CONSOLE_URL, Style::default().fg(theme.link).add_modifier(Modifier::UNDERLINED)),
        ]),
        Line::from(vec![
            Span::styled("  2. Export the Assistant name as ", text_style),
            Span::styled("PINECONE_ASSISTANT_NAME", bold),
        ]),
        Line::styled("  3. Restart the application", text_style),
        Line::from(""),
        Line::styled(
            format!("Assistant name: {}", display_name(&app.assistant_name, &app.config.assistant_name)),
            Style::default().fg(theme.muted),
        ),
        Line::from(""),
        Line::styled("Esc / q: Quit • Ctrl+D: Dark mode", Style::default().fg(theme.muted)),
    ]);

    Paragraph::new(text)
        .block(
            Block::bordered()
                .title("Setup required")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.error))
                .style(theme.panel()),
        )
        .wrap(Wrap { trim: false })
        .render(popup, buf);
}

fn display_name<'a>(reported: &'a str, configured: &'a str) -> &'a str {
    [reported, configured]
        .into_iter()
        .find(|name| !name.is_empty())
        .unwrap_or("(not set)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests_support::test_app;
    use crate::app::{AppMode, MISSING_ASSISTANT_ERROR};
    use crate::modules::assistant::AssistantStatus;
    use crate::util::io::event::AppEvent;
    use crate::ui::test_support::buffer_text;

    #[tokio::test]
    async fn test_missing_assistant_renders_panel_without_chat_form() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::AssistantChecked(Ok(AssistantStatus {
            exists: false,
            assistant_name: "docs-bot".to_string(),
        })));
        assert_eq!(app.mode, AppMode::SetupError);

        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
        let screen = buffer_text(&buf);

        assert!(screen.contains(MISSING_ASSISTANT_ERROR));
        assert!(screen.contains("To resolve this issue:"));
        assert!(screen.contains("PINECONE_ASSISTANT_NAME"));
        assert!(screen.contains(CONSOLE_URL));
        assert!(!screen.contains("Type your message"));
        assert!(!screen.contains("Chat History"));
    }

    #[test]
    fn test_display_name_prefers_reported() {
        assert_eq!(display_name("a", "b"), "a");
        assert_eq!(display_name("", "b"), "b");
        assert_eq!(display_name("", ""), "(not set)");
    }
}
