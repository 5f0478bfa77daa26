pub mod enums;
pub mod task;
pub mod views;

pub use enums::{Filter, Priority, UiMode};
pub use task::{normalize_text, Task, TaskId, MAX_TEXT_CHARS};
pub use views::{checkbox, compute_stats, derive_view, priority_badge, Stats};
