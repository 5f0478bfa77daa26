use crate::app::AppState;
use crate::domain::{UiMode, MAX_TEXT_CHARS};
use crate::ui::styles::{
    border_style, focused_border_style, hint_style, modal_title_style, priority_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the add bar: text input plus priority selector
pub fn render_add_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let active = app.ui_mode == UiMode::AddingTask;

    let mut spans = vec![Span::raw(" > ")];
    if app.input_text.is_empty() && !active {
        spans.push(Span::styled("What needs to be done?", hint_style()));
    } else {
        spans.push(Span::raw(app.input_text.clone()));
    }
    if active {
        spans.push(Span::styled("█", modal_title_style())); // Cursor
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled("priority: ", hint_style()));
    spans.push(Span::styled(
        app.input_priority.label(),
        priority_style(app.input_priority),
    ));

    if active {
        spans.push(Span::styled(
            format!(
                "   {}/{}  Tab priority · Enter add · Esc done",
                app.input_text.chars().count(),
                MAX_TEXT_CHARS
            ),
            hint_style(),
        ));
    }

    let border = if active {
        focused_border_style()
    } else {
        border_style()
    };

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" New task ", title_style())),
    );

    f.render_widget(paragraph, area);
}
