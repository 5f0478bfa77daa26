pub mod filter_bar;
pub mod header_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use filter_bar::{render_filter_bar, render_search_field};
use header_pane::render_header;
use input_form::render_add_bar;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_prompt;
use ratatui::Frame;
use stats_pane::render_stats_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    // Render keybindings bar
    render_keybindings(f, app.ui_mode, layout.keybindings_area);

    // Render panes
    render_header(f, app, layout.header_area);
    render_add_bar(f, app, layout.add_area);
    render_filter_bar(f, app, layout.filter_area);
    render_search_field(f, app, layout.search_area);
    render_stats_pane(f, app, layout.stats_area);
    render_list_pane(f, app, layout.list_area);

    // Prompt goes on top of everything
    render_prompt(f, app, size);
}
