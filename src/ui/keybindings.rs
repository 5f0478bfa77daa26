use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hints for the keys that work in `mode`
fn hints(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Normal => {
            " ↑/↓ select   Space toggle   a add   e edit   p priority   d delete   \
             f/1-3 filter   / search   C clear done   X clear all   q quit"
        }
        UiMode::AddingTask => " type text   Tab priority   Enter add   Esc back",
        UiMode::Searching => " type to filter   Enter apply   Esc back",
        UiMode::EditingTask => " edit text   Enter save   Esc cancel",
        UiMode::Prompt => " y/Enter confirm   n/Esc cancel",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints(mode))).style(hint_style());
    f.render_widget(paragraph, area);
}
