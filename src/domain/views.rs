use super::enums::{Filter, Priority};
use super::task::Task;
use std::cmp::Ordering;

/// Aggregate counts for the whole task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Integer percent, 0 for an empty list
    pub completion_rate: u32,
}

/// Compute stats over the full (unfiltered) list
pub fn compute_stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    Stats {
        total,
        active: total - completed,
        completed,
        completion_rate: completion_rate(completed, total),
    }
}

/// round(completed / total * 100), rounding halves up
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}

/// Display order: priority high first, then newest first
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .weight()
        .cmp(&a.priority.weight())
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Produce the filtered, searched and sorted projection shown in the list
pub fn derive_view(tasks: &[Task], filter: Filter, search: &str) -> Vec<Task> {
    let needle = search.trim().to_lowercase();

    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|t| filter.accepts(t.completed))
        .filter(|t| t.matches(&needle))
        .cloned()
        .collect();

    view.sort_by(display_order);
    view
}

/// Checkbox glyph for a task row
pub fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Badge text for a priority, padded to a fixed width
pub fn priority_badge(priority: Priority) -> String {
    format!("{:<4}", priority.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn create_test_task(id: u64, text: &str, priority: Priority, completed: bool) -> Task {
        let mut task = Task::new(id, text.to_string(), priority, at(id as i64));
        task.completed = completed;
        task
    }

    fn sample() -> Vec<Task> {
        vec![
            create_test_task(1, "Buy milk", Priority::Low, false),
            create_test_task(2, "Write report", Priority::High, true),
            create_test_task(3, "Call mom", Priority::Medium, false),
            create_test_task(4, "Buy stamps", Priority::High, false),
        ]
    }

    fn texts(view: &[Task]) -> Vec<&str> {
        view.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&sample());
        assert_eq!(
            stats,
            Stats {
                total: 4,
                active: 3,
                completed: 1,
                completion_rate: 25,
            }
        );
        assert_eq!(stats.active + stats.completed, stats.total);
    }

    #[test]
    fn test_compute_stats_empty() {
        assert_eq!(compute_stats(&[]), Stats::default());
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13); // 12.5 rounds up
        assert_eq!(completion_rate(3, 3), 100);
        assert_eq!(completion_rate(0, 0), 0);
    }

    #[test]
    fn test_filter_all_keeps_cardinality() {
        let tasks = sample();
        assert_eq!(derive_view(&tasks, Filter::All, "").len(), tasks.len());
    }

    #[test]
    fn test_filter_active_and_completed() {
        let tasks = sample();
        let active = derive_view(&tasks, Filter::Active, "");
        assert!(active.iter().all(|t| !t.completed));
        assert_eq!(active.len(), 3);

        let done = derive_view(&tasks, Filter::Completed, "");
        assert!(done.iter().all(|t| t.completed));
        assert_eq!(texts(&done), vec!["Write report"]);
    }

    #[test]
    fn test_sort_priority_then_newest() {
        let view = derive_view(&sample(), Filter::All, "");
        assert_eq!(
            texts(&view),
            vec!["Buy stamps", "Write report", "Call mom", "Buy milk"]
        );
        for pair in view.windows(2) {
            assert!(pair[0].priority.weight() >= pair[1].priority.weight());
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let view = derive_view(&sample(), Filter::All, "BUY");
        assert_eq!(texts(&view), vec!["Buy stamps", "Buy milk"]);

        let view = derive_view(&sample(), Filter::Active, "  uy m ");
        assert_eq!(texts(&view), vec!["Buy milk"]);

        assert!(derive_view(&sample(), Filter::All, "zzz").is_empty());
    }

    #[test]
    fn test_high_added_after_low_sorts_first() {
        let tasks = vec![
            create_test_task(1, "a", Priority::Low, false),
            create_test_task(2, "b", Priority::High, false),
        ];
        let view = derive_view(&tasks, Filter::All, "");
        assert_eq!(texts(&view), vec!["b", "a"]);
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }
}
