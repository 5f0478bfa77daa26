use crate::app::{AppState, Prompt};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the open prompt, if any
pub fn render_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };

    let modal_area = create_modal_area(area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let (title, message, options) = match prompt {
        Prompt::Notice(message) => (
            " Notice ",
            message.as_str(),
            Line::from(vec![
                Span::styled("  [Enter]", modal_title_style()),
                Span::raw(" OK"),
            ]),
        ),
        Prompt::Confirm { message, .. } => (
            " Confirm ",
            message.as_str(),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style()),
                Span::raw(" Yes  "),
                Span::styled("[n]", modal_title_style()),
                Span::raw(" Cancel"),
            ]),
        ),
    };

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", message)),
        Line::raw(""),
        options,
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
