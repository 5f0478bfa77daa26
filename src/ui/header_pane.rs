use crate::app::AppState;
use crate::ui::styles::{error_style, hint_style, online_style, title_style};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the header: title on the left, clock and connectivity on the right
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut left = vec![Span::styled(" ticklist ", title_style())];
    if !app.store.last_save_ok() {
        left.push(Span::styled(" ⚠ changes not saved ", error_style()));
    }
    f.render_widget(Paragraph::new(Line::from(left)), halves[0]);

    let badge = if app.online {
        Span::styled("● online", online_style())
    } else {
        Span::styled("○ offline", error_style())
    };
    let right = Line::from(vec![
        Span::styled(app.now.format("%a %b %d  %H:%M:%S").to_string(), hint_style()),
        Span::raw("   "),
        badge,
        Span::raw(" "),
    ]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), halves[1]);
}
