//! Provider-neutral model of asynchronous generation tasks.
//!
//! An external provider accepts a text-to-image or image-to-video request,
//! hands back a task ID, and is later polled for that task's status and
//! result. Implementations live in provider crates; the pipeline only sees
//! [`GenerationProvider`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::video::{AspectRatio, Resolution};

/// Which provider endpoint a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Image,
    Video,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Image => "image",
            TaskKind::Video => "video",
        }
    }
}

/// Coarse task status, normalized from whatever the provider reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

/// A task the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTask {
    pub task_id: String,
    pub status: TaskStatus,
}

/// Result of a submission call.
///
/// A rejection is an expected outcome (bad request, quota, transport
/// trouble) and carries the provider's message when one was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(SubmittedTask),
    Rejected { message: Option<String> },
}

impl SubmitOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        SubmitOutcome::Rejected {
            message: Some(message.into()),
        }
    }

    /// The accepted task, if it carries a non-empty task ID.
    pub fn task(&self) -> Option<&SubmittedTask> {
        match self {
            SubmitOutcome::Accepted(task) if !task.task_id.is_empty() => Some(task),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusReport {
    pub status: TaskStatus,
    pub error_message: Option<String>,
}

impl TaskStatusReport {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            error_message: Some(message.into()),
        }
    }
}

/// The output of a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskArtifact {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub file_size_bytes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGenerationRequest {
    pub image_url: String,
    pub prompt: Option<String>,
    pub resolution: Resolution,
    pub duration_secs: i32,
}

/// Failures a provider could not turn into an outcome value.
///
/// Expected provider errors are reported through [`SubmitOutcome::Rejected`]
/// or a `Failed` [`TaskStatusReport`]; this type is for everything else.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider transport error: {0}")]
    Transport(String),

    #[error("Provider internal error: {0}")]
    Internal(String),
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Start a text-to-image task.
    async fn submit_image_generation(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError>;

    /// Start an image-to-video task.
    async fn submit_video_generation(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError>;

    async fn get_task_status(
        &self,
        task_id: &str,
        kind: TaskKind,
    ) -> Result<TaskStatusReport, ProviderError>;

    /// Fetch the artifact of a task. `None` when the task is not completed
    /// or produced nothing.
    async fn get_task_result(
        &self,
        task_id: &str,
        kind: TaskKind,
    ) -> Result<Option<TaskArtifact>, ProviderError>;
}
