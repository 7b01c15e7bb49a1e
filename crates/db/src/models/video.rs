//! Video entity model and DTOs.

use ecomvideo_core::types::{Timestamp, UserId, VideoId};
use ecomvideo_core::video::{AspectRatio, Resolution, StatusId, VideoStatus};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `videos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Video {
    pub id: VideoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub text_prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    pub input_type: String,
    pub resolution: String,
    pub aspect_ratio: String,
    pub duration_secs: i32,
    pub status_id: StatusId,
    pub image_task_id: Option<String>,
    pub video_task_id: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_size_bytes: i64,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Video {
    /// Typed status, or `None` if the stored ID is outside the known set.
    pub fn status(&self) -> Option<VideoStatus> {
        VideoStatus::from_id(self.status_id)
    }

    /// Stored resolution; unrecognized values fall back to the default.
    pub fn resolution(&self) -> Resolution {
        self.resolution.parse().unwrap_or_default()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::parse_or_default(&self.aspect_ratio)
    }
}

/// Insert DTO. Already validated by the caller.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub text_prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    pub duration_secs: i32,
}
