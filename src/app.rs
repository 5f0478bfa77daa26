use crate::domain::{Filter, Priority, Stats, Task, TaskId, UiMode, MAX_TEXT_CHARS};
use crate::error::TodoError;
use crate::persistence::save_filter;
use crate::store::TodoStore;
use crate::watchers::{ProbeConfig, Watchers};
use chrono::{DateTime, Local};
use std::rc::Rc;
use std::time::Instant;

/// Destructive action waiting for a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete(TaskId),
    ClearAll,
    ClearCompleted,
}

/// Modal prompt shown over the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Single-button acknowledgement
    Notice(String),
    /// Yes/no confirmation guarding `action`
    Confirm {
        message: String,
        action: PendingAction,
    },
}

/// Inline edit of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: TaskId,
    pub buffer: String,
}

/// Main application state
pub struct AppState {
    pub store: TodoStore,
    pub filter: Filter,
    pub input_text: String,
    pub input_priority: Priority,
    /// Search text as typed
    pub search_input: String,
    /// Search text after the debounce settled; drives the view
    pub search: String,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub prompt: Option<Prompt>,
    prompt_return: UiMode,
    pub edit: Option<EditState>,
    pub watchers: Watchers,
    pub online: bool,
    pub now: DateTime<Local>,
}

impl AppState {
    pub fn new(store: TodoStore, filter: Filter) -> Self {
        let watchers = Watchers::new();
        let now = watchers.clock.current();

        Self {
            store,
            filter,
            input_text: String::new(),
            input_priority: Priority::Low,
            search_input: String::new(),
            search: String::new(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            prompt: None,
            prompt_return: UiMode::Normal,
            edit: None,
            watchers,
            online: true,
            now,
        }
    }

    /// Start the environment watchers
    pub fn start_watchers(&mut self, probe: &ProbeConfig) {
        self.watchers.start(probe);
        self.online = self.watchers.connectivity.is_online();
    }

    /// Stop the environment watchers
    pub fn stop_watchers(&mut self) {
        self.watchers.stop();
    }

    /// Current filtered/searched/sorted list
    pub fn view(&self) -> Rc<Vec<Task>> {
        self.store.view(self.filter, &self.search)
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    /// Id of the highlighted task, if any
    pub fn selected_id(&self) -> Option<TaskId> {
        self.view().get(self.selected_index).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.view().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    fn select_id(&mut self, id: TaskId) {
        if let Some(idx) = self.view().iter().position(|t| t.id == id) {
            self.selected_index = idx;
        } else {
            self.clamp_selection();
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.view().len() {
            self.selected_index += 1;
        }
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        if self.ui_mode != UiMode::Prompt {
            self.prompt_return = self.ui_mode;
        }
        self.prompt = Some(prompt);
        self.ui_mode = UiMode::Prompt;
    }

    fn notify(&mut self, error: TodoError) {
        tracing::debug!(%error, "validation notice");
        self.open_prompt(Prompt::Notice(error.to_string()));
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.ui_mode = self.prompt_return;
        self.prompt_return = UiMode::Normal;
    }

    /// Answer the open prompt. `yes` runs a confirmed action; a notice is
    /// simply dismissed either way.
    pub fn answer_prompt(&mut self, yes: bool) {
        let Some(prompt) = self.prompt.clone() else {
            return;
        };
        self.close_prompt();

        if let Prompt::Confirm { action, .. } = prompt {
            if yes {
                self.run_action(action);
            } else {
                tracing::debug!(?action, "cancelled");
            }
        }
    }

    fn run_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::Delete(id) => {
                self.store.delete(id);
            }
            PendingAction::ClearAll => {
                self.store.clear_all();
            }
            PendingAction::ClearCompleted => {
                self.store.clear_completed();
            }
        }
        self.clamp_selection();
    }

    pub fn start_add_task(&mut self) {
        self.ui_mode = UiMode::AddingTask;
    }

    pub fn cancel_add_task(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn input_add_char(&mut self, c: char) {
        if self.input_text.chars().count() < MAX_TEXT_CHARS {
            self.input_text.push(c);
        }
    }

    pub fn input_backspace(&mut self) {
        self.input_text.pop();
    }

    pub fn cycle_input_priority(&mut self) {
        self.input_priority = self.input_priority.next();
    }

    /// Add the typed task. Blank input opens a notice and changes nothing.
    pub fn submit_add_task(&mut self) {
        match self.store.add(&self.input_text, self.input_priority) {
            Ok(id) => {
                self.input_text.clear();
                self.input_priority = Priority::Low;
                self.select_id(id);
            }
            Err(e) => self.notify(e),
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle(id);
            self.clamp_selection();
        }
    }

    pub fn cycle_priority_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.cycle_priority(id);
            // Keep the highlight on the task as it moves
            self.select_id(id);
        }
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.request_delete(id);
        }
    }

    /// Ask before deleting one task
    pub fn request_delete(&mut self, id: TaskId) {
        if self.store.get(id).is_none() {
            return;
        }
        self.open_prompt(Prompt::Confirm {
            message: "Delete this task?".to_string(),
            action: PendingAction::Delete(id),
        });
    }

    /// Ask before deleting everything; a notice if there is nothing
    pub fn request_clear_all(&mut self) {
        let count = self.store.tasks().len();
        if count == 0 {
            self.notify(TodoError::NothingToClear);
            return;
        }
        self.open_prompt(Prompt::Confirm {
            message: format!("Delete all {} tasks?", count),
            action: PendingAction::ClearAll,
        });
    }

    /// Ask before deleting completed tasks; a notice if there are none
    pub fn request_clear_completed(&mut self) {
        let count = self.store.completed_count();
        if count == 0 {
            self.notify(TodoError::NoCompleted);
            return;
        }
        self.open_prompt(Prompt::Confirm {
            message: format!("Delete {} completed tasks?", count),
            action: PendingAction::ClearCompleted,
        });
    }

    pub fn start_edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(task) = self.store.get(id) {
            self.edit = Some(EditState {
                id,
                buffer: task.text.clone(),
            });
            self.ui_mode = UiMode::EditingTask;
        }
    }

    pub fn edit_add_char(&mut self, c: char) {
        if let Some(edit) = &mut self.edit {
            if edit.buffer.chars().count() < MAX_TEXT_CHARS {
                edit.buffer.push(c);
            }
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = &mut self.edit {
            edit.buffer.pop();
        }
    }

    /// Save the edit. Blank text keeps the editor open and changes nothing.
    pub fn submit_edit(&mut self) {
        let Some(edit) = self.edit.clone() else {
            return;
        };
        if edit.buffer.trim().is_empty() {
            return;
        }
        self.store.edit(edit.id, &edit.buffer);
        self.edit = None;
        self.ui_mode = UiMode::Normal;
        self.select_id(edit.id);
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Switch filter and remember it across restarts
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        save_filter(self.store.storage(), filter);
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    /// Move keyboard focus to the search field
    pub fn focus_search(&mut self) {
        if self.ui_mode == UiMode::Prompt {
            return;
        }
        self.edit = None;
        self.ui_mode = UiMode::Searching;
    }

    pub fn leave_search(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Apply the typed search right away and return to the list
    pub fn submit_search(&mut self) {
        if let Some(term) = self.watchers.search.flush() {
            self.apply_search(term);
        }
        self.leave_search();
    }

    pub fn search_add_char(&mut self, c: char) {
        self.search_input.push(c);
        self.watchers.search.push(self.search_input.clone(), Instant::now());
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.watchers.search.push(self.search_input.clone(), Instant::now());
    }

    /// Clear the search immediately (no debounce)
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.watchers.search.cancel();
        self.apply_search(String::new());
    }

    fn apply_search(&mut self, term: String) {
        if self.search != term {
            tracing::debug!(term = %term, "search settled");
            self.search = term;
            self.selected_index = 0;
        }
    }

    /// Poll clock, connectivity and the search debouncer
    pub fn tick(&mut self, now: Instant) {
        if let Some(reading) = self.watchers.clock.poll(now, &crate::ticker::SystemClock) {
            self.now = reading;
        }
        if let Some(online) = self.watchers.connectivity.poll() {
            self.online = online;
        }
        if let Some(term) = self.watchers.search.poll(now) {
            self.apply_search(term);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::metadata::FILTER_KEY;
    use crate::persistence::{load_filter, MemoryStorage, TASKS_KEY};
    use crate::ticker::{Clock, FixedClock};
    use crate::watchers::SEARCH_DEBOUNCE_MS;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn create_test_app() -> (AppState, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        let store = TodoStore::with_tasks(
            Vec::new(),
            Box::new(Rc::clone(&storage)),
            Box::new(FixedClock::new()),
            TASKS_KEY,
        );
        let mut app = AppState::new(store, Filter::All);
        app.add("Task 1", Priority::Low);
        app.add("Task 2", Priority::Medium);
        (app, storage)
    }

    impl AppState {
        fn add(&mut self, text: &str, priority: Priority) {
            self.input_text = text.to_string();
            self.input_priority = priority;
            self.submit_add_task();
        }

        fn view_texts(&self) -> Vec<String> {
            self.view().iter().map(|t| t.text.clone()).collect()
        }
    }

    #[test]
    fn test_app_state_new() {
        let (app, _) = create_test_app();
        assert_eq!(app.store.tasks().len(), 2);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.prompt.is_none());
    }

    #[test]
    fn test_add_resets_input() {
        let (mut app, _) = create_test_app();
        app.start_add_task();
        app.input_add_char('x');
        app.cycle_input_priority();
        app.cycle_input_priority();
        assert_eq!(app.input_priority, Priority::High);

        app.submit_add_task();
        assert!(app.input_text.is_empty());
        assert_eq!(app.input_priority, Priority::Low);
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert_eq!(app.view_texts()[0], "x");
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_add_blank_shows_notice() {
        let (mut app, _) = create_test_app();
        app.start_add_task();
        app.input_text = "   ".to_string();
        app.input_priority = Priority::High;
        app.submit_add_task();

        assert_eq!(app.store.tasks().len(), 2);
        assert_eq!(app.prompt, Some(Prompt::Notice(TodoError::EmptyText.to_string())));
        // Input is kept on failure
        assert_eq!(app.input_priority, Priority::High);

        app.answer_prompt(true);
        assert!(app.prompt.is_none());
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert_eq!(app.store.tasks().len(), 2);
    }

    #[test]
    fn test_add_when_ids_run_out_shows_notice() {
        let clock = FixedClock::new();
        let last = Task::new(u64::MAX, "last".to_string(), Priority::Low, clock.now());
        let store = TodoStore::with_tasks(
            vec![last],
            Box::new(MemoryStorage::new()),
            Box::new(clock),
            TASKS_KEY,
        );
        let mut app = AppState::new(store, Filter::All);

        app.add("one more", Priority::High);
        assert_eq!(app.prompt, Some(Prompt::Notice(TodoError::IdsExhausted.to_string())));
        assert_eq!(app.store.tasks().len(), 1);
    }

    #[test]
    fn test_input_is_capped() {
        let (mut app, _) = create_test_app();
        for _ in 0..150 {
            app.input_add_char('a');
        }
        assert_eq!(app.input_text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_high_priority_added_first_in_view() {
        let storage = Rc::new(MemoryStorage::new());
        let store = TodoStore::with_tasks(
            Vec::new(),
            Box::new(Rc::clone(&storage)),
            Box::new(FixedClock::new()),
            TASKS_KEY,
        );
        let mut app = AppState::new(store, Filter::All);
        app.add("a", Priority::Low);
        app.add("b", Priority::High);
        assert_eq!(app.view_texts(), vec!["b", "a"]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut app, _) = create_test_app();
        let id = app.selected_id().unwrap();

        app.request_delete_selected();
        assert_eq!(app.ui_mode, UiMode::Prompt);
        app.answer_prompt(false);
        assert_eq!(app.store.tasks().len(), 2);
        assert_eq!(app.ui_mode, UiMode::Normal);

        app.request_delete_selected();
        app.answer_prompt(true);
        assert_eq!(app.store.tasks().len(), 1);
        assert!(app.store.get(id).is_none());
    }

    #[test]
    fn test_add_then_delete_restores_tasks() {
        let (mut app, _) = create_test_app();
        let before = app.store.tasks().to_vec();

        app.add("temporary", Priority::High);
        let id = app.selected_id().unwrap();
        app.request_delete(id);
        app.answer_prompt(true);

        assert_eq!(app.store.tasks().to_vec(), before);
    }

    #[test]
    fn test_clear_all() {
        let (mut app, _) = create_test_app();
        app.request_clear_all();
        assert_eq!(
            app.prompt,
            Some(Prompt::Confirm {
                message: "Delete all 2 tasks?".to_string(),
                action: PendingAction::ClearAll,
            })
        );
        app.answer_prompt(true);
        assert!(app.store.tasks().is_empty());

        app.request_clear_all();
        assert_eq!(app.prompt, Some(Prompt::Notice(TodoError::NothingToClear.to_string())));
    }

    #[test]
    fn test_clear_completed_with_none_only_notifies() {
        let (mut app, storage) = create_test_app();
        let before = app.store.tasks().to_vec();
        let writes = storage.write_count();

        app.request_clear_completed();
        assert_eq!(app.prompt, Some(Prompt::Notice(TodoError::NoCompleted.to_string())));

        // Even "yes" on a notice does nothing
        app.answer_prompt(true);
        assert_eq!(app.store.tasks().to_vec(), before);
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_clear_completed() {
        let (mut app, _) = create_test_app();
        app.toggle_selected();
        app.request_clear_completed();
        assert_eq!(
            app.prompt,
            Some(Prompt::Confirm {
                message: "Delete 1 completed tasks?".to_string(),
                action: PendingAction::ClearCompleted,
            })
        );
        app.answer_prompt(true);
        assert_eq!(app.store.tasks().len(), 1);
        assert_eq!(app.stats().completed, 0);
    }

    #[test]
    fn test_toggle_under_active_filter_clamps_selection() {
        let (mut app, _) = create_test_app();
        app.set_filter(Filter::Active);
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.toggle_selected();
        assert_eq!(app.view().len(), 1);
        assert_eq!(app.selected_index, 0);
        assert!(app.view().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_filter_is_persisted() {
        let (mut app, storage) = create_test_app();
        app.set_filter(Filter::Completed);
        assert_eq!(storage.raw(FILTER_KEY), Some("completed".to_string()));
        assert_eq!(load_filter(storage.as_ref()), Filter::Completed);

        app.cycle_filter();
        assert_eq!(app.filter, Filter::All);
    }

    #[test]
    fn test_inline_edit() {
        let (mut app, _) = create_test_app();
        let id = app.selected_id().unwrap();

        app.start_edit_selected();
        assert_eq!(app.ui_mode, UiMode::EditingTask);
        app.edit.as_mut().unwrap().buffer.clear();
        app.submit_edit();
        // Blank edit keeps the editor open
        assert_eq!(app.ui_mode, UiMode::EditingTask);

        for c in "Renamed".chars() {
            app.edit_add_char(c);
        }
        app.submit_edit();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.store.get(id).unwrap().text, "Renamed");
    }

    #[test]
    fn test_cancel_edit_keeps_text() {
        let (mut app, _) = create_test_app();
        let id = app.selected_id().unwrap();
        let original = app.store.get(id).unwrap().text.clone();

        app.start_edit_selected();
        app.edit_backspace();
        app.cancel_edit();
        assert_eq!(app.store.get(id).unwrap().text, original);
        assert!(app.edit.is_none());
    }

    #[test]
    fn test_cycle_priority_follows_task() {
        let (mut app, _) = create_test_app();
        // View: Task 2 (medium), Task 1 (low)
        app.move_selection_down();
        let id = app.selected_id().unwrap();

        app.cycle_priority_selected(); // medium, still behind the newer Task 2
        app.cycle_priority_selected(); // high, moves to the top
        assert_eq!(app.selected_id(), Some(id));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_search_is_debounced() {
        let (mut app, _) = create_test_app();
        app.focus_search();
        app.search_add_char('2');
        assert_eq!(app.search, "");
        assert_eq!(app.view().len(), 2);

        let later = Instant::now() + Duration::from_millis(SEARCH_DEBOUNCE_MS + 50);
        app.tick(later);
        assert_eq!(app.search, "2");
        assert_eq!(app.view_texts(), vec!["Task 2"]);

        app.clear_search();
        assert_eq!(app.view().len(), 2);
    }

    #[test]
    fn test_focus_search_blocked_by_prompt() {
        let (mut app, _) = create_test_app();
        app.request_clear_all();
        app.focus_search();
        assert_eq!(app.ui_mode, UiMode::Prompt);
    }

    #[test]
    fn test_stats_invariant_after_operations() {
        let (mut app, _) = create_test_app();
        app.toggle_selected();
        app.add("Task 3", Priority::High);
        app.request_clear_completed();
        app.answer_prompt(true);

        let stats = app.stats();
        assert_eq!(stats.active + stats.completed, stats.total);
        assert_eq!(stats.total, app.store.tasks().len());
    }
}
