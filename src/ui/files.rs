use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget, Wrap},
};
use crate::app::App;
use crate::modules::files::FilesState;
use crate::ui::style::Theme;

/// Files uploaded to the assistant; the ones cited by the last reply are highlighted.
pub fn render_files_panel(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .title(format!("Files ({})", app.files.files().len()))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.muted))
        .style(theme.panel());

    if !app.files.is_loaded() {
        Paragraph::new("Loading files...")
            .block(block)
            .style(Style::default().fg(theme.muted))
            .render(area, buf);
        return;
    }

    if app.files.files().is_empty() {
        Paragraph::new("No files uploaded to this assistant.")
            .block(block)
            .style(Style::default().fg(theme.muted))
            .wrap(Wrap { trim: true })
            .render(area, buf);
        return;
    }

    let referenced = app.session.referenced_files();
    let items: Vec<ListItem> = app
        .files
        .files()
        .iter()
        .map(|file| {
            let cited = FilesState::is_referenced(file, referenced);
            let (marker, style) = if cited {
                ("★ ", Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(theme.text))
            };

            let mut spans = vec![Span::styled(marker, style), Span::styled(file.name.clone(), style)];
            if let Some(status) = file.status.as_deref().filter(|s| *s != "Available") {
                spans.push(Span::styled(format!(" ({})", status), Style::default().fg(theme.muted)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    Widget::render(List::new(items).block(block), area, buf);
}
