use crate::app::{AppState, Prompt};
use crate::domain::{Filter, UiMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    // Global shortcut runs first and swallows the key
    if app.watchers.shortcut.observe(&key) {
        app.focus_search();
        return false;
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_add_mode(app, key),
        UiMode::Searching => handle_search_mode(app, key),
        UiMode::EditingTask => handle_edit_mode(app, key),
        UiMode::Prompt => handle_prompt_mode(app, key),
    }
}

/// Plain character input (Ctrl/Alt chords are not text)
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Toggle completed
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),

        // Add task
        KeyCode::Char('a') | KeyCode::Char('i') => app.start_add_task(),

        // Edit selected text inline
        KeyCode::Char('e') => app.start_edit_selected(),

        // Cycle priority
        KeyCode::Char('p') => app.cycle_priority_selected(),

        // Delete (asks first)
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_selected(),

        // Bulk clears (ask first)
        KeyCode::Char('C') => app.request_clear_completed(),
        KeyCode::Char('X') => app.request_clear_all(),

        // Filters
        KeyCode::Char('f') | KeyCode::Tab => app.cycle_filter(),
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Completed),

        // Search
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Esc => app.clear_search(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,

        _ => {}
    }
    false
}

/// Handle keys while typing a new task
fn handle_add_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_add_task(),
        KeyCode::Esc => app.cancel_add_task(),
        // Tab cycles the priority selector
        KeyCode::Tab => app.cycle_input_priority(),
        KeyCode::Backspace => app.input_backspace(),
        _ => {
            if let Some(c) = typed_char(&key) {
                app.input_add_char(c);
            }
        }
    }
    false
}

/// Handle keys in the search field
fn handle_search_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.leave_search(),
        KeyCode::Backspace => app.search_backspace(),
        _ => {
            if let Some(c) = typed_char(&key) {
                app.search_add_char(c);
            }
        }
    }
    false
}

/// Handle keys while editing a task inline
fn handle_edit_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.edit_backspace(),
        _ => {
            if let Some(c) = typed_char(&key) {
                app.edit_add_char(c);
            }
        }
    }
    false
}

/// Handle keys while a prompt is open
fn handle_prompt_mode(app: &mut AppState, key: KeyEvent) -> bool {
    match app.prompt {
        Some(Prompt::Notice(_)) => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.answer_prompt(false),
            _ => {}
        },
        Some(Prompt::Confirm { .. }) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_prompt(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_prompt(false),
            _ => {}
        },
        None => app.ui_mode = UiMode::Normal,
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::persistence::{MemoryStorage, TASKS_KEY};
    use crate::store::TodoStore;
    use crate::ticker::FixedClock;

    fn create_test_app() -> AppState {
        let mut store = TodoStore::with_tasks(
            Vec::new(),
            Box::new(MemoryStorage::new()),
            Box::new(FixedClock::new()),
            TASKS_KEY,
        );
        store.add("Test task", Priority::Low).unwrap();
        let mut app = AppState::new(store, Filter::All);
        app.watchers.shortcut.start();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_handle_navigation() {
        let mut app = create_test_app();
        app.store.add("Task 2", Priority::Low).unwrap();

        assert_eq!(app.selected_index, 0);
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_handle_add_task() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        type_text(&mut app, "New");
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.input_priority, Priority::High);

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.store.tasks().len(), 2);
        assert_eq!(app.view()[0].text, "New");
        assert_eq!(app.view()[0].priority, Priority::High);

        // 'q' while typing is text, not quit
        assert!(!handle_key(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.input_text, "q");

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_delete_confirm_and_cancel() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.ui_mode, UiMode::Prompt);
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.store.tasks().len(), 1);

        handle_key(&mut app, key(KeyCode::Delete));
        handle_key(&mut app, key(KeyCode::Char('y')));
        assert!(app.store.tasks().is_empty());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_notice_dismiss() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('C')));
        assert!(matches!(app.prompt, Some(Prompt::Notice(_))));

        // 'y' does not dismiss a notice
        handle_key(&mut app, key(KeyCode::Char('y')));
        assert!(app.prompt.is_some());

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.prompt.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_shortcut_focuses_search_from_any_mode() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "draft");

        let chord = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::CONTROL);
        handle_key(&mut app, chord);
        assert_eq!(app.ui_mode, UiMode::Searching);
        // Chord is consumed, not typed anywhere
        assert_eq!(app.input_text, "draft");
        assert!(app.search_input.is_empty());

        type_text(&mut app, "test");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.search, "test");
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_toggle_and_priority() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(app.store.tasks()[0].completed);

        handle_key(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.store.tasks()[0].priority, Priority::Medium);
    }

    #[test]
    fn test_handle_inline_edit() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('e')));
        for _ in 0.."task".len() {
            handle_key(&mut app, key(KeyCode::Backspace));
        }
        type_text(&mut app, "run");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.store.tasks()[0].text, "Test run");
    }

    #[test]
    fn test_handle_filter_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.filter, Filter::Completed);
        assert!(app.view().is_empty());

        handle_key(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.filter, Filter::All);
    }
}
