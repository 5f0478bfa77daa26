use crate::app::AppState;
use crate::domain::{Filter, Stats, UiMode};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, hint_style, modal_title_style,
    selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn filter_count(filter: Filter, stats: &Stats) -> usize {
    match filter {
        Filter::All => stats.total,
        Filter::Active => stats.active,
        Filter::Completed => stats.completed,
    }
}

/// Render the filter tabs with their counts
pub fn render_filter_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let stats = app.stats();

    let mut spans = vec![Span::raw(" ")];
    for (i, filter) in Filter::all().iter().enumerate() {
        let label = format!(" {} {} ({}) ", i + 1, filter.name(), filter_count(*filter, &stats));
        let style = if *filter == app.filter {
            selected_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Show ", title_style())),
    );

    f.render_widget(paragraph, area);
}

/// Render the search field
pub fn render_search_field(f: &mut Frame, app: &AppState, area: Rect) {
    let active = app.ui_mode == UiMode::Searching;

    let mut spans = vec![Span::raw(" / ")];
    if app.search_input.is_empty() && !active {
        spans.push(Span::styled("Ctrl+/ to search", hint_style()));
    } else {
        spans.push(Span::raw(app.search_input.clone()));
    }
    if active {
        spans.push(Span::styled("█", modal_title_style())); // Cursor
    }
    // Typed text not applied yet
    if app.watchers.search.is_pending() {
        spans.push(Span::styled(" …", hint_style()));
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
            .title(Span::styled(" Search ", title_style())),
    );

    f.render_widget(paragraph, area);
}
