use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub header_area: Rect,
    pub add_area: Rect,
    pub filter_area: Rect,
    pub search_area: Rect,
    pub stats_area: Rect,
    pub list_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Header: title, clock, connectivity (1 row)
/// - Add bar (3 rows)
/// - Filter bar | Search field (3 rows)
/// - Stats with completion gauge (3 rows)
/// - Task list (rest)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(1), // Header
            Constraint::Length(3), // Add bar
            Constraint::Length(3), // Filter + search
            Constraint::Length(3), // Stats
            Constraint::Min(0),    // Task list
        ])
        .split(area);

    let filter_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Filters
            Constraint::Percentage(45), // Search
        ])
        .split(chunks[3]);

    MainLayout {
        keybindings_area: chunks[0],
        header_area: chunks[1],
        add_area: chunks[2],
        filter_area: filter_row[0],
        search_area: filter_row[1],
        stats_area: chunks[4],
        list_area: chunks[5],
    }
}

/// Create centered modal area for prompts
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Percentage(30),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
