use super::enums::Priority;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Stable task identifier, increasing in creation order
pub type TaskId = u64;

/// Longest task text kept (in chars)
pub const MAX_TEXT_CHARS: usize = 100;

/// Trim user text and cap it at `MAX_TEXT_CHARS`.
/// Returns None when nothing but whitespace is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let capped: String = trimmed.chars().take(MAX_TEXT_CHARS).collect();
    // Cutting may expose trailing whitespace
    Some(capped.trim_end().to_string())
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Set once at creation
    pub created_at: DateTime<Local>,
    /// Refreshed by toggle and edit
    pub updated_at: DateTime<Local>,
}

impl Task {
    /// Create a task; `text` must already be normalized
    pub fn new(id: TaskId, text: String, priority: Priority, now: DateTime<Local>) -> Self {
        Self {
            id,
            text,
            completed: false,
            priority,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip the completed flag
    pub fn toggle(&mut self, now: DateTime<Local>) {
        self.completed = !self.completed;
        self.updated_at = now;
    }

    /// Replace the text. Returns false (and changes nothing) for blank input.
    pub fn set_text(&mut self, raw: &str, now: DateTime<Local>) -> bool {
        match normalize_text(raw) {
            Some(text) => {
                self.text = text;
                self.updated_at = now;
                true
            }
            None => false,
        }
    }

    /// Advance priority low -> medium -> high -> low.
    /// Leaves `updated_at` alone.
    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.next();
    }

    /// Case-insensitive substring match; `needle_lower` must be lowercased
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.text.to_lowercase().contains(needle_lower)
    }

    /// Creation time formatted for the list
    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}
