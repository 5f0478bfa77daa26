use crate::app::AppState;
use crate::ui::styles::{border_style, gauge_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render totals and the completion gauge
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let stats = app.stats();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Progress ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(0)])
        .split(inner);

    let counts = Line::from(vec![
        Span::styled(" Total ", title_style()),
        Span::raw(format!("{}  ", stats.total)),
        Span::styled("Active ", title_style()),
        Span::raw(format!("{}  ", stats.active)),
        Span::styled("Done ", title_style()),
        Span::raw(format!("{}", stats.completed)),
    ]);
    f.render_widget(Paragraph::new(counts), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(stats.completion_rate.min(100) as u16)
        .label(format!("{}% complete", stats.completion_rate));
    f.render_widget(gauge, chunks[1]);
}
