//! One state-machine step per video.
//!
//! ```text
//! Pending          -> GeneratingImage | Failed
//! GeneratingImage  -> GeneratingVideo | Failed | (unchanged while running)
//! GeneratingVideo  -> Completed       | Failed | (unchanged while running)
//! GeneratingImage without a task ID -> Pending
//! ```
//!
//! Provider-reported failures always end in `Failed`. Only an `Err` from
//! the provider itself escapes [`VideoPipeline::advance`].

use std::sync::Arc;

use chrono::Utc;
use ecomvideo_core::generation::{
    GenerationProvider, ImageGenerationRequest, SubmitOutcome, TaskKind, TaskStatus,
    VideoGenerationRequest,
};
use ecomvideo_core::video::VideoStatus;
use ecomvideo_db::models::video::Video;
use ecomvideo_events::{EventBus, VideoEvent};

use crate::error::PipelineError;
use crate::stage::{GeneratedImage, ImageTrail, Stage, StageError, TaskTrail};

/// What a single [`VideoPipeline::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The video moved to a new status and must be persisted.
    Transitioned { from: VideoStatus, to: VideoStatus },
    /// Nothing to do yet (task still running, or terminal video).
    Unchanged,
    /// The row is in a state the pipeline cannot interpret; left untouched.
    Skipped,
}

impl StepOutcome {
    pub fn is_dirty(self) -> bool {
        matches!(self, StepOutcome::Transitioned { .. })
    }
}

pub struct VideoPipeline {
    provider: Arc<dyn GenerationProvider>,
    events: Arc<EventBus>,
}

impl VideoPipeline {
    pub fn new(provider: Arc<dyn GenerationProvider>, events: Arc<EventBus>) -> Self {
        Self { provider, events }
    }

    /// Advance `video` by at most one transition.
    ///
    /// `video` is only mutated when the returned outcome is
    /// [`StepOutcome::Transitioned`].
    pub async fn advance(&self, video: &mut Video) -> Result<StepOutcome, PipelineError> {
        let Some(status) = video.status() else {
            tracing::warn!(video_id = %video.id, status_id = video.status_id, "Unknown video status");
            return Ok(StepOutcome::Skipped);
        };
        if status.is_terminal() {
            return Ok(StepOutcome::Unchanged);
        }

        let stage = match Stage::from_record(video) {
            Ok(stage) => stage,
            Err(StageError::MissingImageTask) => {
                tracing::warn!(video_id = %video.id, "GeneratingImage without task ID, resetting to Pending");
                return Ok(self.transition(video, status, Stage::Pending));
            }
            Err(e) => {
                tracing::warn!(video_id = %video.id, error = %e, "Unexpected video state");
                return Ok(StepOutcome::Skipped);
            }
        };

        let next = match stage {
            Stage::Pending => Some(self.start_image(video).await?),
            Stage::GeneratingImage { image_task_id } => {
                self.poll_image(video, image_task_id).await?
            }
            Stage::GeneratingVideo {
                image,
                video_task_id,
            } => self.poll_video(video, image, video_task_id).await?,
            Stage::Completed { .. } | Stage::Failed { .. } => None,
        };

        Ok(match next {
            Some(next) => self.transition(video, status, next),
            None => StepOutcome::Unchanged,
        })
    }

    /// Record an unexpected processing failure on `video`.
    pub fn fail(&self, video: &mut Video, message: String) -> StepOutcome {
        let from = video.status().unwrap_or(VideoStatus::Pending);
        let trail = TaskTrail::from_record(video);
        self.transition(video, from, Stage::Failed { message, trail })
    }

    async fn start_image(&self, video: &Video) -> Result<Stage, PipelineError> {
        let request = ImageGenerationRequest {
            prompt: video.text_prompt.clone(),
            negative_prompt: video.negative_prompt.clone(),
            style: video.style.clone(),
            resolution: video.resolution(),
            aspect_ratio: video.aspect_ratio(),
        };

        let outcome = self.provider.submit_image_generation(&request).await?;
        Ok(match submitted_task_id(&outcome) {
            Ok(task_id) => {
                tracing::info!(video_id = %video.id, task_id = %task_id, "Image generation started");
                Stage::GeneratingImage {
                    image_task_id: task_id,
                }
            }
            Err(message) => Stage::Failed {
                message: message
                    .unwrap_or_else(|| "Failed to start image generation - no task ID received".into()),
                trail: TaskTrail::default(),
            },
        })
    }

    async fn poll_image(
        &self,
        video: &Video,
        image_task_id: String,
    ) -> Result<Option<Stage>, PipelineError> {
        let report = self
            .provider
            .get_task_status(&image_task_id, TaskKind::Image)
            .await?;

        let trail = TaskTrail {
            image_task_id: Some(image_task_id.clone()),
            ..TaskTrail::default()
        };

        let failed = |message: String| {
            Some(Stage::Failed {
                message,
                trail: trail.clone(),
            })
        };

        match report.status {
            TaskStatus::InProgress => Ok(None),
            TaskStatus::Failed => Ok(failed(
                report
                    .error_message
                    .unwrap_or_else(|| "Image generation failed".into()),
            )),
            TaskStatus::Cancelled => Ok(failed(
                "Image generation was cancelled by the provider".into(),
            )),
            TaskStatus::Completed => {
                let artifact = self
                    .provider
                    .get_task_result(&image_task_id, TaskKind::Image)
                    .await?
                    .filter(|artifact| !artifact.url.is_empty());
                let Some(artifact) = artifact else {
                    return Ok(failed(
                        "Failed to retrieve image result after completion.".into(),
                    ));
                };

                tracing::info!(video_id = %video.id, image_url = %artifact.url, "Image ready");
                let image = GeneratedImage {
                    task_id: image_task_id,
                    url: artifact.url,
                };
                self.start_video(video, image).await.map(Some)
            }
        }
    }

    async fn start_video(&self, video: &Video, image: GeneratedImage) -> Result<Stage, PipelineError> {
        let request = VideoGenerationRequest {
            image_url: image.url.clone(),
            prompt: Some(video.text_prompt.clone()),
            resolution: video.resolution(),
            duration_secs: video.duration_secs,
        };

        let outcome = self.provider.submit_video_generation(&request).await?;
        Ok(match submitted_task_id(&outcome) {
            Ok(video_task_id) => {
                tracing::info!(video_id = %video.id, task_id = %video_task_id, "Video generation started");
                Stage::GeneratingVideo {
                    image: image.into(),
                    video_task_id,
                }
            }
            Err(message) => Stage::Failed {
                message: message
                    .unwrap_or_else(|| "Failed to start video generation - no task ID received".into()),
                trail: TaskTrail {
                    image_task_id: Some(image.task_id),
                    image_url: Some(image.url),
                    video_task_id: None,
                },
            },
        })
    }

    async fn poll_video(
        &self,
        video: &Video,
        image: ImageTrail,
        video_task_id: String,
    ) -> Result<Option<Stage>, PipelineError> {
        let report = self
            .provider
            .get_task_status(&video_task_id, TaskKind::Video)
            .await?;

        let trail = TaskTrail {
            image_task_id: image.task_id.clone(),
            image_url: image.url.clone(),
            video_task_id: Some(video_task_id.clone()),
        };

        let failed = |message: String| {
            Some(Stage::Failed {
                message,
                trail: trail.clone(),
            })
        };

        match report.status {
            TaskStatus::InProgress => Ok(None),
            TaskStatus::Failed => Ok(failed(
                report
                    .error_message
                    .unwrap_or_else(|| "Video generation failed".into()),
            )),
            TaskStatus::Cancelled => Ok(failed(
                "Video generation was cancelled by the provider".into(),
            )),
            TaskStatus::Completed => {
                let artifact = self
                    .provider
                    .get_task_result(&video_task_id, TaskKind::Video)
                    .await?
                    .filter(|artifact| !artifact.url.is_empty());
                let Some(artifact) = artifact else {
                    return Ok(failed(
                        "Failed to retrieve video result after completion.".into(),
                    ));
                };

                tracing::info!(video_id = %video.id, video_url = %artifact.url, "Video ready");
                Ok(Some(Stage::Completed {
                    image,
                    video_task_id,
                    video_url: artifact.url,
                    file_size_bytes: artifact.file_size_bytes,
                    completed_at: Utc::now(),
                }))
            }
        }
    }

    fn transition(&self, video: &mut Video, from: VideoStatus, next: Stage) -> StepOutcome {
        let to = next.status();
        let event = match &next {
            Stage::Completed { video_url, .. } => VideoEvent::completed(video.id, video_url.clone()),
            Stage::Failed { message, .. } => {
                tracing::warn!(video_id = %video.id, error = %message, "Video failed");
                VideoEvent::failed(video.id, message.clone())
            }
            _ => VideoEvent::stage_changed(video.id, from, to),
        };

        next.apply(video, Utc::now());
        self.events.publish(event);
        StepOutcome::Transitioned { from, to }
    }
}

/// Task ID of an accepted submission, or the rejection message.
fn submitted_task_id(outcome: &SubmitOutcome) -> Result<String, Option<String>> {
    match (outcome.task(), outcome) {
        (Some(task), _) => Ok(task.task_id.clone()),
        (None, SubmitOutcome::Rejected { message }) => Err(message.clone()),
        (None, SubmitOutcome::Accepted(_)) => Err(None),
    }
}
