use crate::domain::{
    compute_stats, derive_view, normalize_text, Filter, Priority, Stats, Task, TaskId,
};
use crate::error::TodoError;
use crate::persistence::{load_tasks, save_tasks, seed_tasks, Storage};
use crate::ticker::Clock;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What changed in a committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(TaskId),
    Toggled(TaskId),
    Edited(TaskId),
    Reprioritized(TaskId),
    Deleted(TaskId),
    Cleared { removed: usize },
    ClearedCompleted { removed: usize },
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent, &[Task])>;

/// Memoized derived view
struct ViewCache {
    revision: u64,
    filter: Filter,
    search: String,
    view: Rc<Vec<Task>>,
}

/// Owner of the task list.
///
/// The list sits behind an `Rc` and every mutation goes through
/// `Rc::make_mut`, so a snapshot taken with `snapshot()` never changes under
/// its holder. Each committed mutation bumps the revision, is written to
/// storage, then reported to subscribers.
pub struct TodoStore {
    tasks: Rc<Vec<Task>>,
    revision: u64,
    last_id: TaskId,
    key: String,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    last_save_ok: bool,
    view_cache: RefCell<Option<ViewCache>>,
    stats_cache: Cell<Option<(u64, Stats)>>,
    recomputes: Cell<usize>,
}

impl TodoStore {
    /// Load the list stored under `key`, seeding sample tasks on first run
    pub fn open(storage: Box<dyn Storage>, clock: Box<dyn Clock>, key: &str) -> Self {
        let tasks = load_tasks(storage.as_ref(), key, seed_tasks(clock.as_ref()));
        Self::with_tasks(tasks, storage, clock, key)
    }

    /// Build a store around an already-loaded list
    pub fn with_tasks(
        tasks: Vec<Task>,
        storage: Box<dyn Storage>,
        clock: Box<dyn Clock>,
        key: &str,
    ) -> Self {
        let last_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            tasks: Rc::new(tasks),
            revision: 0,
            last_id,
            key: key.to_string(),
            storage,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
            last_save_ok: true,
            view_cache: RefCell::new(None),
            stats_cache: Cell::new(None),
            recomputes: Cell::new(0),
        }
    }

    /// Tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    /// Cheap shared handle to the current list
    pub fn snapshot(&self) -> Rc<Vec<Task>> {
        Rc::clone(&self.tasks)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Whether the most recent write reached storage
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Register a listener called after every committed mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Task]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, event: StoreEvent) {
        self.revision += 1;
        tracing::debug!(?event, revision = self.revision, "committed");
        self.last_save_ok = save_tasks(self.storage.as_ref(), &self.key, &self.tasks);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &self.tasks);
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Append a new task. Blank text is rejected.
    pub fn add(&mut self, text: &str, priority: Priority) -> Result<TaskId, TodoError> {
        let text = normalize_text(text).ok_or(TodoError::EmptyText)?;
        let id = self.last_id.checked_add(1).ok_or(TodoError::IdsExhausted)?;
        self.last_id = id;

        let task = Task::new(id, text, priority, self.clock.now());
        Rc::make_mut(&mut self.tasks).push(task);
        self.commit(StoreEvent::Added(id));
        Ok(id)
    }

    /// Flip completion; false if `id` is unknown
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let now = self.clock.now();
        Rc::make_mut(&mut self.tasks)[idx].toggle(now);
        self.commit(StoreEvent::Toggled(id));
        true
    }

    /// Replace the text; false if `id` is unknown or the text is blank
    pub fn edit(&mut self, id: TaskId, text: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if normalize_text(text).is_none() {
            return false;
        }
        let now = self.clock.now();
        Rc::make_mut(&mut self.tasks)[idx].set_text(text, now);
        self.commit(StoreEvent::Edited(id));
        true
    }

    /// Cycle priority low -> medium -> high -> low; false if `id` is unknown
    pub fn cycle_priority(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        Rc::make_mut(&mut self.tasks)[idx].cycle_priority();
        self.commit(StoreEvent::Reprioritized(id));
        true
    }

    /// Remove one task; false if `id` is unknown
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        Rc::make_mut(&mut self.tasks).remove(idx);
        self.commit(StoreEvent::Deleted(id));
        true
    }

    /// Remove every task; returns how many were removed
    pub fn clear_all(&mut self) -> usize {
        let removed = self.tasks.len();
        if removed == 0 {
            return 0;
        }
        self.tasks = Rc::new(Vec::new());
        self.commit(StoreEvent::Cleared { removed });
        removed
    }

    /// Remove completed tasks; returns how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.completed_count();
        if removed == 0 {
            return 0;
        }
        let remaining: Vec<Task> = self.tasks.iter().filter(|t| !t.completed).cloned().collect();
        self.tasks = Rc::new(remaining);
        self.commit(StoreEvent::ClearedCompleted { removed });
        removed
    }

    /// Filtered, searched and sorted view, recomputed only when the list,
    /// the filter or the search term changed since the last call
    pub fn view(&self, filter: Filter, search: &str) -> Rc<Vec<Task>> {
        let mut cache = self.view_cache.borrow_mut();
        if let Some(cached) = cache.as_ref() {
            if cached.revision == self.revision
                && cached.filter == filter
                && cached.search == search
            {
                return Rc::clone(&cached.view);
            }
        }

        self.recomputes.set(self.recomputes.get() + 1);
        let view = Rc::new(derive_view(&self.tasks, filter, search));
        *cache = Some(ViewCache {
            revision: self.revision,
            filter,
            search: search.to_string(),
            view: Rc::clone(&view),
        });
        view
    }

    /// Stats over the whole list, cached per revision
    pub fn stats(&self) -> Stats {
        if let Some((revision, stats)) = self.stats_cache.get() {
            if revision == self.revision {
                return stats;
            }
        }
        let stats = compute_stats(&self.tasks);
        self.stats_cache.set(Some((self.revision, stats)));
        stats
    }

    #[cfg(test)]
    /// Number of times the view was actually recomputed
    pub fn recompute_count(&self) -> usize {
        self.recomputes.get()
    }
}
