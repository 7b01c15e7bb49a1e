//! Typed Freepik response envelopes.
//!
//! Freepik answers with `{"data": {...}}`, but the inner object comes in
//! two layouts depending on the endpoint and API version:
//!
//! - Mystic layout: `{"task_id", "status", "generated": [urls]}`
//! - Legacy layout: `{"id", "status"}`
//!
//! Status polls sometimes omit the task ID and only carry
//! `{"status", "generated"}`; those parse as [`TaskData::StatusOnly`].
//!
//! Anything else is kept as [`TaskData::Unrecognized`] so callers can
//! report it instead of failing deserialization.

use ecomvideo_core::generation::TaskStatus;
use serde::Deserialize;

/// Top-level `{"data": ...}` wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub data: TaskData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TaskData {
    Mystic(MysticData),
    Legacy(LegacyTaskData),
    StatusOnly(StatusOnlyData),
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MysticData {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub generated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyTaskData {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusOnlyData {
    pub status: String,
    #[serde(default)]
    pub generated: Vec<String>,
}

impl TaskData {
    /// Non-empty task ID, whichever layout carried it.
    pub fn task_id(&self) -> Option<&str> {
        let id = match self {
            TaskData::Mystic(data) => data.task_id.as_str(),
            TaskData::Legacy(data) => data.id.as_str(),
            TaskData::StatusOnly(_) | TaskData::Unrecognized(_) => return None,
        };
        (!id.is_empty()).then_some(id)
    }

    /// Normalized status, or `None` for an unrecognized layout.
    pub fn status(&self) -> Option<TaskStatus> {
        match self {
            TaskData::Mystic(data) => Some(map_status(data.status.as_deref())),
            TaskData::Legacy(data) => Some(map_status(data.status.as_deref())),
            TaskData::StatusOnly(data) => Some(map_status(Some(&data.status))),
            TaskData::Unrecognized(_) => None,
        }
    }

    /// First generated URL when the task has completed.
    pub fn first_generated(&self) -> Option<&str> {
        let generated = match self {
            TaskData::Mystic(data) => &data.generated,
            TaskData::StatusOnly(data) => &data.generated,
            TaskData::Legacy(_) | TaskData::Unrecognized(_) => return None,
        };
        if self.status() != Some(TaskStatus::Completed) {
            return None;
        }
        generated.first().map(String::as_str)
    }
}

/// Parse a raw response body into its inner task data.
pub fn parse_envelope(body: &str) -> Result<TaskData, serde_json::Error> {
    serde_json::from_str::<Envelope>(body).map(|envelope| envelope.data)
}

/// Map a Freepik status string to [`TaskStatus`], case-insensitively.
///
/// Freepik reports `CREATED` and `IN_PROGRESS` while a task runs; anything
/// unknown is treated as still running.
pub fn map_status(status: Option<&str>) -> TaskStatus {
    match status.map(str::to_ascii_uppercase).as_deref() {
        Some("COMPLETED") => TaskStatus::Completed,
        Some("FAILED") => TaskStatus::Failed,
        Some("CANCELLED") => TaskStatus::Cancelled,
        _ => TaskStatus::InProgress,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
