use crate::domain::{normalize_text, Priority, Task, TaskId};
use crate::error::StorageError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Current payload version written by `serialize_tasks`
pub const PAYLOAD_VERSION: u32 = 1;

/// Versioned wrapper around the task list
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    version: u32,
    tasks: &'a [Task],
}

/// Either the versioned wrapper or a bare legacy array.
/// Records stay raw so one bad entry cannot sink the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Versioned { version: u32, tasks: Vec<Value> },
    Legacy(Vec<Value>),
}

/// Task record as found on disk; tolerant of fields older payloads lack
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: TaskId,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    created_at: DateTime<Local>,
    #[serde(default)]
    updated_at: Option<DateTime<Local>>,
}

impl StoredTask {
    fn into_task(self) -> Option<Task> {
        let text = normalize_text(&self.text)?;
        Some(Task {
            id: self.id,
            text,
            completed: self.completed,
            priority: self.priority,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
        })
    }
}

/// Serialize the task list into the versioned JSON payload
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, StorageError> {
    let envelope = Envelope {
        version: PAYLOAD_VERSION,
        tasks,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse a stored payload (versioned or legacy bare array).
/// Records that do not decode, have blank text or repeat an id are dropped
/// one by one so the list invariants hold.
pub fn parse_tasks(content: &str) -> Result<Vec<Task>, StorageError> {
    let records = match serde_json::from_str::<Payload>(content)? {
        Payload::Versioned { version, tasks } => {
            if version > PAYLOAD_VERSION {
                return Err(StorageError::UnsupportedVersion(version));
            }
            tasks
        }
        Payload::Legacy(tasks) => tasks,
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());
    for (index, raw) in records.into_iter().enumerate() {
        let record = match serde_json::from_value::<StoredTask>(raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping unreadable stored task");
                continue;
            }
        };
        let id = record.id;
        if !seen.insert(id) {
            tracing::warn!(id, "dropping stored task with duplicate id");
            continue;
        }
        match record.into_task() {
            Some(task) => tasks.push(task),
            None => tracing::warn!(id, "dropping stored task with blank text"),
        }
    }

    Ok(tasks)
}
