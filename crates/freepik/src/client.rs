//! [`GenerationProvider`] implementation backed by the Freepik API.
//!
//! Every expected failure (non-2xx, unreadable body, transport error) is
//! folded into the returned outcome; the `Err` side of the trait is never
//! used by this client.

use async_trait::async_trait;
use ecomvideo_core::generation::{
    GenerationProvider, ImageGenerationRequest, ProviderError, SubmitOutcome, SubmittedTask,
    TaskArtifact, TaskKind, TaskStatus, TaskStatusReport, VideoGenerationRequest,
};
use ecomvideo_core::video::{AspectRatio, Resolution};

use crate::api::{FreepikApi, FreepikApiError, KlingRequest, MysticRequest, MysticStyling};
use crate::config::FreepikConfig;
use crate::messages::{parse_envelope, TaskData};

/// Fallback artifact dimensions when Freepik does not report them.
const DEFAULT_ARTIFACT_SIZE: u32 = 1024;

/// Snap a requested duration to the buckets Kling v2 accepts.
pub fn snap_duration(duration_secs: i32) -> &'static str {
    if duration_secs <= 5 {
        "5"
    } else {
        "10"
    }
}

/// Mystic `aspect_ratio` parameter for a frame shape.
pub fn mystic_aspect_ratio(aspect_ratio: AspectRatio) -> &'static str {
    match aspect_ratio {
        AspectRatio::Portrait916 => "social_story_9_16",
        AspectRatio::Landscape169 => "widescreen_16_9",
        AspectRatio::Square11 => "square_1_1",
        AspectRatio::Portrait45 => "social_post_4_5",
        AspectRatio::Portrait23 => "portrait_2_3",
    }
}

/// Mystic `resolution` parameter for a target output resolution.
pub fn mystic_resolution(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Sd480p | Resolution::Hd720p => "1k",
        Resolution::FullHd1080p => "2k",
    }
}

pub struct FreepikClient {
    api: FreepikApi,
}

impl FreepikClient {
    pub fn new(config: &FreepikConfig) -> Result<Self, FreepikApiError> {
        Ok(Self {
            api: FreepikApi::new(config)?,
        })
    }

    pub fn from_api(api: FreepikApi) -> Self {
        Self { api }
    }

    async fn fetch_task(&self, task_id: &str, kind: TaskKind) -> Result<String, FreepikApiError> {
        match kind {
            TaskKind::Image => self.api.get_mystic_task(task_id).await,
            TaskKind::Video => self.api.get_kling_task(task_id).await,
        }
    }
}

#[async_trait]
impl GenerationProvider for FreepikClient {
    async fn submit_image_generation(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError> {
        if request.prompt.trim().is_empty() {
            return Ok(SubmitOutcome::rejected("Prompt is required"));
        }

        let body = MysticRequest {
            prompt: request.prompt.clone(),
            negative_prompt: request.negative_prompt.clone(),
            styling: request.style.clone().map(|style| MysticStyling { style }),
            aspect_ratio: mystic_aspect_ratio(request.aspect_ratio),
            model: "realism",
            num_images: 1,
            resolution: mystic_resolution(request.resolution),
            engine: "automatic",
            creative_detailing: 25,
            filter_nsfw: true,
        };

        let raw = match self.api.create_mystic_task(&body).await {
            Ok(raw) => raw,
            Err(FreepikApiError::ApiError { status, body }) => {
                tracing::error!(status, body = %body, "Image generation request rejected");
                return Ok(SubmitOutcome::rejected(format!("API call failed: {status}")));
            }
            Err(e) => {
                tracing::error!(error = %e, "Image generation request failed");
                return Ok(SubmitOutcome::rejected(e.to_string()));
            }
        };

        let data = match parse_envelope(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Unparseable image generation response");
                return Ok(SubmitOutcome::Rejected { message: None });
            }
        };

        match (data.task_id(), data.status()) {
            (Some(task_id), Some(status)) => {
                tracing::info!(task_id, "Image generation started");
                Ok(SubmitOutcome::Accepted(SubmittedTask {
                    task_id: task_id.to_string(),
                    status,
                }))
            }
            _ => {
                tracing::error!("Image generation response carried no task ID");
                Ok(SubmitOutcome::Rejected { message: None })
            }
        }
    }

    async fn submit_video_generation(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError> {
        let duration = snap_duration(request.duration_secs);
        tracing::debug!(
            requested = request.duration_secs,
            duration,
            "Snapped video duration"
        );

        let body = KlingRequest {
            image: request.image_url.clone(),
            duration,
            prompt: request.prompt.clone(),
        };

        let raw = match self.api.create_kling_task(&body).await {
            Ok(raw) => raw,
            Err(FreepikApiError::ApiError { status, body }) => {
                tracing::error!(status, body = %body, "Video generation request rejected");
                return Ok(SubmitOutcome::rejected(format!(
                    "API call failed: {status} - {body}"
                )));
            }
            Err(e) => {
                tracing::error!(error = %e, "Video generation request failed");
                return Ok(SubmitOutcome::rejected(e.to_string()));
            }
        };

        let task = parse_envelope(&raw)
            .ok()
            .and_then(|data| Some((data.task_id()?.to_string(), data.status()?)));

        match task {
            Some((task_id, status)) => {
                tracing::info!(task_id = %task_id, "Video generation started");
                Ok(SubmitOutcome::Accepted(SubmittedTask { task_id, status }))
            }
            None => {
                tracing::error!(response = %raw, "Could not extract video task ID");
                Ok(SubmitOutcome::rejected(
                    "Invalid response from provider - could not extract task ID",
                ))
            }
        }
    }

    async fn get_task_status(
        &self,
        task_id: &str,
        kind: TaskKind,
    ) -> Result<TaskStatusReport, ProviderError> {
        let raw = match self.fetch_task(task_id, kind).await {
            Ok(raw) => raw,
            Err(FreepikApiError::ApiError { status, body }) => {
                tracing::error!(task_id, kind = kind.as_str(), status, "Task status call failed");
                return Ok(TaskStatusReport::failed(format!(
                    "API call failed: {status} - {body}"
                )));
            }
            Err(e) => {
                tracing::error!(task_id, kind = kind.as_str(), error = %e, "Task status call failed");
                return Ok(TaskStatusReport::failed(e.to_string()));
            }
        };

        let status = parse_envelope(&raw).ok().as_ref().and_then(TaskData::status);
        match status {
            Some(TaskStatus::Failed) => Ok(TaskStatusReport::failed("Task failed")),
            Some(status) => {
                tracing::debug!(task_id, kind = kind.as_str(), ?status, "Task status");
                Ok(TaskStatusReport::new(status))
            }
            None => {
                tracing::error!(task_id, response = %raw, "Unparseable task status response");
                Ok(TaskStatusReport::failed("Failed to parse API response"))
            }
        }
    }

    async fn get_task_result(
        &self,
        task_id: &str,
        kind: TaskKind,
    ) -> Result<Option<TaskArtifact>, ProviderError> {
        let raw = match self.fetch_task(task_id, kind).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(task_id, kind = kind.as_str(), error = %e, "Task result call failed");
                return Ok(None);
            }
        };

        let data = match parse_envelope(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(task_id, error = %e, "Unparseable task result response");
                return Ok(None);
            }
        };

        let Some(url) = data.first_generated() else {
            tracing::warn!(task_id, kind = kind.as_str(), "Task has no generated output");
            return Ok(None);
        };

        let format = match kind {
            TaskKind::Image => "png",
            TaskKind::Video => "mp4",
        };

        Ok(Some(TaskArtifact {
            url: url.to_string(),
            width: DEFAULT_ARTIFACT_SIZE,
            height: DEFAULT_ARTIFACT_SIZE,
            format: format.to_string(),
            file_size_bytes: 0,
        }))
    }
}
