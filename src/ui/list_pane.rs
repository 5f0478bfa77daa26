use crate::app::AppState;
use crate::domain::{checkbox, priority_badge, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, hint_style, modal_title_style, priority_style,
    selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let view = app.view();

    let title = if app.search.is_empty() {
        format!(" Tasks · {} ", app.filter.name())
    } else {
        format!(" Tasks · {} · \"{}\" ", app.filter.name(), app.search.trim())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    if view.is_empty() {
        let message = if app.store.tasks().is_empty() {
            " No tasks yet. Press a to add one."
        } else {
            " No tasks match."
        };
        let paragraph = Paragraph::new(Span::styled(message, hint_style())).block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .iter()
        .map(|task| {
            let editing = app
                .edit
                .as_ref()
                .filter(|e| e.id == task.id)
                .map(|e| e.buffer.as_str());
            ListItem::new(create_task_line(task, editing))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(default_style())
        .highlight_style(selected_style());

    // Stateful render keeps the selection scrolled into view
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a task
/// Format: [x] Buy milk  HIGH  2024-03-01 09:30
fn create_task_line(task: &Task, editing: Option<&str>) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(" {} ", checkbox(task.completed)))];

    match editing {
        Some(buffer) => {
            spans.push(Span::styled(buffer.to_string(), modal_title_style()));
            spans.push(Span::styled("█", modal_title_style())); // Cursor
        }
        None if task.completed => spans.push(Span::styled(task.text.clone(), done_style())),
        None => spans.push(Span::raw(task.text.clone())),
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        priority_badge(task.priority),
        priority_style(task.priority),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(task.created_label(), hint_style()));

    Line::from(spans)
}
