//! Typed view of a video's position in the pipeline.
//!
//! The `videos` row stores the status and every task/result column
//! independently. [`Stage`] carries exactly the data each status needs, so
//! a row that violates the column invariants is rejected at
//! [`Stage::from_record`] instead of surfacing mid-step.

use ecomvideo_core::types::Timestamp;
use ecomvideo_core::video::{StatusId, VideoStatus};
use ecomvideo_db::models::video::Video;

/// Output of a completed image task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub task_id: String,
    pub url: String,
}

/// Image columns carried through the video stages. Polling the video task
/// only needs its task ID, so either column may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTrail {
    pub task_id: Option<String>,
    pub url: Option<String>,
}

impl From<GeneratedImage> for ImageTrail {
    fn from(image: GeneratedImage) -> Self {
        Self {
            task_id: Some(image.task_id),
            url: Some(image.url),
        }
    }
}

/// Task progress kept on a failed video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTrail {
    pub image_task_id: Option<String>,
    pub image_url: Option<String>,
    pub video_task_id: Option<String>,
}

impl TaskTrail {
    pub fn from_record(video: &Video) -> Self {
        Self {
            image_task_id: video.image_task_id.clone(),
            image_url: video.image_url.clone(),
            video_task_id: video.video_task_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Pending,
    GeneratingImage {
        image_task_id: String,
    },
    GeneratingVideo {
        image: ImageTrail,
        video_task_id: String,
    },
    Completed {
        image: ImageTrail,
        video_task_id: String,
        video_url: String,
        file_size_bytes: i64,
        completed_at: Timestamp,
    },
    Failed {
        message: String,
        trail: TaskTrail,
    },
}

/// A row that cannot be viewed as a [`Stage`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// `GeneratingImage` without an image task ID. Recoverable by
    /// resetting to `Pending`.
    #[error("GeneratingImage without an image task ID")]
    MissingImageTask,

    #[error("{status} row is missing {column}")]
    MissingColumn {
        status: VideoStatus,
        column: &'static str,
    },

    #[error("Status {0} is not driven by the pipeline")]
    NotPipelineStatus(VideoStatus),

    #[error("Unknown status ID {0}")]
    UnknownStatus(StatusId),
}

fn required(
    value: &Option<String>,
    status: VideoStatus,
    column: &'static str,
) -> Result<String, StageError> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or(StageError::MissingColumn { status, column })
}

impl Stage {
    pub fn from_record(video: &Video) -> Result<Self, StageError> {
        let status =
            VideoStatus::from_id(video.status_id).ok_or(StageError::UnknownStatus(video.status_id))?;

        let image = || ImageTrail {
            task_id: video.image_task_id.clone(),
            url: video.image_url.clone(),
        };

        match status {
            VideoStatus::Pending => Ok(Stage::Pending),
            VideoStatus::GeneratingImage => match &video.image_task_id {
                Some(id) if !id.is_empty() => Ok(Stage::GeneratingImage {
                    image_task_id: id.clone(),
                }),
                _ => Err(StageError::MissingImageTask),
            },
            VideoStatus::GeneratingVideo => Ok(Stage::GeneratingVideo {
                video_task_id: required(&video.video_task_id, status, "video_task_id")?,
                image: image(),
            }),
            VideoStatus::Completed => Ok(Stage::Completed {
                image: image(),
                video_task_id: required(&video.video_task_id, status, "video_task_id")?,
                video_url: required(&video.video_url, status, "video_url")?,
                file_size_bytes: video.file_size_bytes,
                completed_at: video.completed_at.ok_or(StageError::MissingColumn {
                    status,
                    column: "completed_at",
                })?,
            }),
            VideoStatus::Failed => Ok(Stage::Failed {
                message: required(&video.error_message, status, "error_message")?,
                trail: TaskTrail::from_record(video),
            }),
            VideoStatus::Processing | VideoStatus::Cancelled => {
                Err(StageError::NotPipelineStatus(status))
            }
        }
    }

    pub fn status(&self) -> VideoStatus {
        match self {
            Stage::Pending => VideoStatus::Pending,
            Stage::GeneratingImage { .. } => VideoStatus::GeneratingImage,
            Stage::GeneratingVideo { .. } => VideoStatus::GeneratingVideo,
            Stage::Completed { .. } => VideoStatus::Completed,
            Stage::Failed { .. } => VideoStatus::Failed,
        }
    }

    /// Write this stage into `video`, replacing every pipeline column.
    pub fn apply(self, video: &mut Video, now: Timestamp) {
        video.status_id = self.status().id();
        video.updated_at = now;
        video.error_message = None;
        video.completed_at = None;
        video.video_url = None;

        match self {
            Stage::Pending => {
                video.image_task_id = None;
                video.image_url = None;
                video.video_task_id = None;
            }
            Stage::GeneratingImage { image_task_id } => {
                video.image_task_id = Some(image_task_id);
                video.image_url = None;
                video.video_task_id = None;
            }
            Stage::GeneratingVideo {
                image,
                video_task_id,
            } => {
                video.image_task_id = image.task_id;
                video.image_url = image.url;
                video.video_task_id = Some(video_task_id);
            }
            Stage::Completed {
                image,
                video_task_id,
                video_url,
                file_size_bytes,
                completed_at,
            } => {
                video.image_task_id = image.task_id;
                video.image_url = image.url;
                video.video_task_id = Some(video_task_id);
                video.video_url = Some(video_url);
                video.file_size_bytes = file_size_bytes;
                video.completed_at = Some(completed_at);
            }
            Stage::Failed { message, trail } => {
                video.image_task_id = trail.image_task_id;
                video.image_url = trail.image_url;
                video.video_task_id = trail.video_task_id;
                video.error_message = Some(message);
            }
        }
    }
}
