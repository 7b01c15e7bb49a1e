//! Shared fixtures: an in-memory `VideoStore` and a scripted provider.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use ecomvideo_core::generation::{
    GenerationProvider, ImageGenerationRequest, ProviderError, SubmitOutcome, SubmittedTask,
    TaskArtifact, TaskKind, TaskStatus, TaskStatusReport, VideoGenerationRequest,
};
use ecomvideo_core::types::VideoId;
use ecomvideo_core::video::{AspectRatio, Resolution, VideoStatus, IN_FLIGHT_STATUSES};
use ecomvideo_db::models::video::Video;
use ecomvideo_pipeline::{BatchSaveReport, StoreError, VideoStore};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Video fixtures
// ---------------------------------------------------------------------------

/// A fresh Pending video. `age_secs` pushes `created_at` into the past so
/// ordering is deterministic.
pub fn pending_video(prompt: &str, age_secs: i64) -> Video {
    let created = Utc::now() - Duration::seconds(age_secs);
    Video {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "Product clip".into(),
        description: String::new(),
        text_prompt: prompt.into(),
        negative_prompt: None,
        style: None,
        input_type: "text".into(),
        resolution: Resolution::Hd720p.as_str().into(),
        aspect_ratio: AspectRatio::Portrait916.as_str().into(),
        duration_secs: 8,
        status_id: VideoStatus::Pending.id(),
        image_task_id: None,
        video_task_id: None,
        image_url: None,
        video_url: None,
        thumbnail_url: None,
        file_size_bytes: 0,
        error_message: None,
        created_at: created,
        updated_at: created,
        completed_at: None,
    }
}

pub fn generating_image(prompt: &str, image_task_id: &str) -> Video {
    let mut video = pending_video(prompt, 0);
    video.status_id = VideoStatus::GeneratingImage.id();
    video.image_task_id = Some(image_task_id.into());
    video
}

pub fn generating_video(prompt: &str, image_task_id: &str, video_task_id: &str) -> Video {
    let mut video = generating_image(prompt, image_task_id);
    video.status_id = VideoStatus::GeneratingVideo.id();
    video.image_url = Some(format!("https://cdn.example/{image_task_id}.png"));
    video.video_task_id = Some(video_task_id.into());
    video
}

pub fn artifact(url: &str) -> TaskArtifact {
    TaskArtifact {
        url: url.into(),
        width: 1024,
        height: 1024,
        format: "mp4".into(),
        file_size_bytes: 4096,
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    videos: Mutex<Vec<Video>>,
    fail_fetch: AtomicBool,
    fail_save: Mutex<HashSet<VideoId>>,
    fetched_at: Mutex<Vec<tokio::time::Instant>>,
    pub save_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with(videos: Vec<Video>) -> Self {
        Self {
            videos: Mutex::new(videos),
            ..Self::default()
        }
    }

    pub fn get(&self, id: VideoId) -> Video {
        self.videos
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .expect("video in store")
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves_for(&self, id: VideoId) {
        self.fail_save.lock().unwrap().insert(id);
    }

    pub fn clear_save_failures(&self) {
        self.fail_save.lock().unwrap().clear();
    }

    /// When each `list_in_flight` call happened, i.e. when each tick began.
    pub fn fetch_times(&self) -> Vec<tokio::time::Instant> {
        self.fetched_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn list_in_flight(&self) -> Result<Vec<Video>, StoreError> {
        self.fetched_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        let mut in_flight: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| IN_FLIGHT_STATUSES.iter().any(|s| s.id() == v.status_id))
            .cloned()
            .collect();
        in_flight.sort_by_key(|v| v.created_at);
        Ok(in_flight)
    }

    async fn save_batch(&self, videos: &[Video]) -> BatchSaveReport {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.fail_save.lock().unwrap().clone();
        let mut stored = self.videos.lock().unwrap();
        let mut report = BatchSaveReport::default();
        for video in videos {
            if failing.contains(&video.id) {
                report
                    .failures
                    .push((video.id, StoreError::Unavailable("write rejected".into())));
                continue;
            }
            match stored.iter_mut().find(|v| v.id == video.id) {
                Some(slot) => {
                    *slot = video.clone();
                    report.saved += 1;
                }
                None => report.failures.push((video.id, StoreError::Missing(video.id))),
            }
        }
        report
    }
}

// ---------------------------------------------------------------------------
// ScriptedProvider
// ---------------------------------------------------------------------------

/// Provider stub driven by per-prompt and per-task scripts.
///
/// Unscripted submissions are accepted with sequential task IDs
/// (`img-1`, `vid-1`, ...); unscripted statuses are `InProgress`;
/// unscripted results are `None`.
#[derive(Default)]
pub struct ScriptedProvider {
    image_submissions: Mutex<HashMap<String, SubmitOutcome>>,
    video_submissions: Mutex<HashMap<String, SubmitOutcome>>,
    statuses: Mutex<HashMap<String, TaskStatusReport>>,
    results: Mutex<HashMap<String, TaskArtifact>>,
    /// Prompts or task IDs whose calls return `Err`.
    erroring: Mutex<HashSet<String>>,
    /// Task IDs whose status call never resolves.
    hanging: Mutex<HashSet<String>>,
    /// Every status call takes this long before answering.
    status_delay: Mutex<Option<StdDuration>>,
    next_image: AtomicUsize,
    next_video: AtomicUsize,
    pub calls: AtomicUsize,
    pub video_requests: Mutex<Vec<VideoGenerationRequest>>,
}

impl ScriptedProvider {
    pub fn reject_image(&self, prompt: &str, outcome: SubmitOutcome) {
        self.image_submissions
            .lock()
            .unwrap()
            .insert(prompt.into(), outcome);
    }

    pub fn reject_video(&self, image_url: &str, outcome: SubmitOutcome) {
        self.video_submissions
            .lock()
            .unwrap()
            .insert(image_url.into(), outcome);
    }

    pub fn set_status(&self, task_id: &str, status: TaskStatus, error: Option<&str>) {
        self.statuses.lock().unwrap().insert(
            task_id.into(),
            TaskStatusReport {
                status,
                error_message: error.map(str::to_string),
            },
        );
    }

    pub fn complete(&self, task_id: &str, url: &str) {
        self.set_status(task_id, TaskStatus::Completed, None);
        self.results
            .lock()
            .unwrap()
            .insert(task_id.into(), artifact(url));
    }

    /// Complete `task_id` with a specific artifact.
    pub fn complete_with(&self, task_id: &str, artifact: TaskArtifact) {
        self.set_status(task_id, TaskStatus::Completed, None);
        self.results
            .lock()
            .unwrap()
            .insert(task_id.into(), artifact);
    }

    pub fn error_on(&self, key: &str) {
        self.erroring.lock().unwrap().insert(key.into());
    }

    pub fn hang_on(&self, task_id: &str) {
        self.hanging.lock().unwrap().insert(task_id.into());
    }

    pub fn delay_status(&self, delay: StdDuration) {
        *self.status_delay.lock().unwrap() = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_error(&self, key: &str) -> Result<(), ProviderError> {
        if self.erroring.lock().unwrap().contains(key) {
            return Err(ProviderError::Transport(format!("connection reset ({key})")));
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn submit_image_generation(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_error(&request.prompt)?;
        if let Some(outcome) = self.image_submissions.lock().unwrap().get(&request.prompt) {
            return Ok(outcome.clone());
        }
        let n = self.next_image.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmitOutcome::Accepted(SubmittedTask {
            task_id: format!("img-{n}"),
            status: TaskStatus::InProgress,
        }))
    }

    async fn submit_video_generation(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<SubmitOutcome, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.video_requests.lock().unwrap().push(request.clone());
        self.check_error(&request.image_url)?;
        if let Some(outcome) = self.video_submissions.lock().unwrap().get(&request.image_url) {
            return Ok(outcome.clone());
        }
        let n = self.next_video.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmitOutcome::Accepted(SubmittedTask {
            task_id: format!("vid-{n}"),
            status: TaskStatus::InProgress,
        }))
    }

    async fn get_task_status(
        &self,
        task_id: &str,
        _kind: TaskKind,
    ) -> Result<TaskStatusReport, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hangs = self.hanging.lock().unwrap().contains(task_id);
        if hangs {
            std::future::pending::<()>().await;
        }
        let delay = *self.status_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_error(task_id)?;
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .unwrap_or_else(|| TaskStatusReport::new(TaskStatus::InProgress)))
    }

    async fn get_task_result(
        &self,
        task_id: &str,
        _kind: TaskKind,
    ) -> Result<Option<TaskArtifact>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.lock().unwrap().get(task_id).cloned())
    }
}
