use super::serializer::{parse_tasks, serialize_tasks};
use super::storage::Storage;
use crate::domain::{Priority, Task};
use crate::ticker::Clock;
use chrono::Duration;

/// Storage key holding the task list
pub const TASKS_KEY: &str = "ticklist-todos";

/// Key an unreadable payload is copied to before anything can overwrite it
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}

/// Load the task list stored under `key`.
///
/// Never fails: a missing key yields `default`, an unreadable or malformed
/// payload yields an empty list. Both cases are logged.
pub fn load_tasks(storage: &dyn Storage, key: &str, default: Vec<Task>) -> Vec<Task> {
    let content = match storage.get(key) {
        Ok(Some(content)) => content,
        Ok(None) => {
            tracing::info!(key, count = default.len(), "no stored tasks, using defaults");
            return default;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored tasks");
            return Vec::new();
        }
    };

    match parse_tasks(&content) {
        Ok(tasks) => {
            tracing::info!(key, count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "stored tasks are unreadable, starting empty");
            let backup = backup_key(key);
            match storage.set(&backup, &content) {
                Ok(()) => tracing::warn!(key = %backup, "unreadable payload kept as backup"),
                Err(e) => tracing::error!(key = %backup, error = %e, "failed to back up payload"),
            }
            Vec::new()
        }
    }
}

/// Write the task list under `key`. Returns false (after logging) on failure.
pub fn save_tasks(storage: &dyn Storage, key: &str, tasks: &[Task]) -> bool {
    let result = serialize_tasks(tasks).and_then(|payload| storage.set(key, &payload));
    match result {
        Ok(()) => {
            tracing::debug!(key, count = tasks.len(), "saved tasks");
            true
        }
        Err(e) => {
            tracing::error!(key, error = %e, "failed to save tasks");
            false
        }
    }
}

/// Sample tasks shown on first run
pub fn seed_tasks(clock: &dyn Clock) -> Vec<Task> {
    let now = clock.now();
    vec![
        Task::new(
            1,
            "Add your first task with 'a'".to_string(),
            Priority::High,
            now - Duration::seconds(3),
        ),
        Task::new(
            2,
            "Search with Ctrl+/".to_string(),
            Priority::Medium,
            now - Duration::seconds(2),
        ),
        {
            let mut done = Task::new(
                3,
                "Start ticklist".to_string(),
                Priority::Low,
                now - Duration::seconds(1),
            );
            done.completed = true;
            done
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::storage::{FileStorage, MemoryStorage};
    use crate::ticker::FixedClock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_key_returns_default() {
        let storage = MemoryStorage::new();
        let clock = FixedClock::new();
        let seed = seed_tasks(&clock);

        let loaded = load_tasks(&storage, TASKS_KEY, seed.clone());
        assert_eq!(loaded, seed);
    }

    #[test]
    fn test_corrupt_payload_returns_empty() {
        let storage = MemoryStorage::new().with_entry(TASKS_KEY, "{oops");
        let clock = FixedClock::new();

        let loaded = load_tasks(&storage, TASKS_KEY, seed_tasks(&clock));
        assert!(loaded.is_empty());
        assert_eq!(storage.raw(&backup_key(TASKS_KEY)), Some("{oops".to_string()));
    }

    #[test]
    fn test_unreadable_record_does_not_lose_the_rest_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let payload = r#"[
            {"id": 1, "text": "keep me", "createdAt": "2024-03-01T09:30:00Z"},
            {"id": 2, "text": "broken", "createdAt": "2024. 3. 1. 오후 3:00:00"}
        ]"#;
        storage.set(TASKS_KEY, payload).unwrap();

        let mut tasks = load_tasks(&storage, TASKS_KEY, Vec::new());
        assert_eq!(tasks.len(), 1);

        let clock = FixedClock::new();
        tasks.push(Task::new(3, "new".to_string(), Priority::Low, clock.now()));
        assert!(save_tasks(&storage, TASKS_KEY, &tasks));

        let texts: Vec<String> = load_tasks(&storage, TASKS_KEY, Vec::new())
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["keep me", "new"]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let clock = FixedClock::new();
        let mut tasks = seed_tasks(&clock);
        tasks[0].toggle(clock.now());

        assert!(save_tasks(&storage, TASKS_KEY, &tasks));
        assert_eq!(load_tasks(&storage, TASKS_KEY, Vec::new()), tasks);
    }

    #[test]
    fn test_save_empty_list_is_persisted() {
        let storage = MemoryStorage::new();
        let clock = FixedClock::new();

        assert!(save_tasks(&storage, TASKS_KEY, &seed_tasks(&clock)));
        assert!(save_tasks(&storage, TASKS_KEY, &[]));
        assert!(load_tasks(&storage, TASKS_KEY, seed_tasks(&clock)).is_empty());
    }

    #[test]
    fn test_save_failure_reports_false() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(!save_tasks(&storage, TASKS_KEY, &[]));
        assert_eq!(storage.raw(TASKS_KEY), None);
    }

    #[test]
    fn test_seed_tasks_shape() {
        let clock = FixedClock::new();
        let seed = seed_tasks(&clock);
        assert_eq!(seed.len(), 3);
        assert!(seed.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(seed.iter().filter(|t| t.completed).count(), 1);
    }
}
