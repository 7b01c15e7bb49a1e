//! Handlers for the `/videos` resource.
//!
//! Submission only records a Pending job; the worker's scheduler picks it
//! up on its next tick.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ecomvideo_core::error::CoreError;
use ecomvideo_core::status::project_status_id;
use ecomvideo_core::types::{Timestamp, UserId, VideoId};
use ecomvideo_core::video::{
    validate_new_video, AspectRatio, Resolution, VideoStatus, DEFAULT_DURATION_SECS,
    QUICK_MAX_DURATION_SECS,
};
use ecomvideo_db::models::video::{CreateVideo, Video};
use ecomvideo_db::repositories::video_repo::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use ecomvideo_db::repositories::VideoRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /videos` and `POST /videos/quick`.
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub text_prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    /// `sd_480p`, `hd_720p` or `full_hd_1080p`; defaults to `sd_480p`.
    pub resolution: Option<String>,
    /// `"9:16"` style ratio; unknown values fall back to `9:16`.
    pub aspect_ratio: Option<String>,
    /// Requested length in seconds.
    pub duration: Option<i32>,
}

/// Video record plus the client-facing status projection.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: VideoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub text_prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    pub width: u32,
    pub height: u32,
    pub duration: i32,
    pub status: &'static str,
    pub progress: u8,
    pub message: &'static str,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_size_bytes: i64,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let projection = project_status_id(video.status_id);
        let resolution = video.resolution();
        let aspect_ratio = video.aspect_ratio();
        let (width, height) = aspect_ratio.dimensions(resolution);
        Self {
            status: status_name(video.status_id),
            progress: projection.progress,
            message: projection.message,
            id: video.id,
            user_id: video.user_id,
            title: video.title,
            description: video.description,
            text_prompt: video.text_prompt,
            negative_prompt: video.negative_prompt,
            style: video.style,
            resolution,
            aspect_ratio,
            width,
            height,
            duration: video.duration_secs,
            image_url: video.image_url,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            file_size_bytes: video.file_size_bytes,
            error_message: video.error_message,
            created_at: video.created_at,
            updated_at: video.updated_at,
            completed_at: video.completed_at,
        }
    }
}

/// Body of `GET /videos/{id}/status`.
#[derive(Debug, Serialize)]
pub struct VideoStatusResponse {
    pub id: VideoId,
    pub status: &'static str,
    pub progress: u8,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn status_name(status_id: i16) -> &'static str {
    VideoStatus::from_id(status_id)
        .map(VideoStatus::as_str)
        .unwrap_or("Unknown")
}

/// Validate a request and turn it into an insert DTO.
fn build_create(input: CreateVideoRequest) -> AppResult<CreateVideo> {
    if input.user_id.is_nil() {
        return Err(CoreError::Validation("User ID is required".into()).into());
    }

    let duration_secs = input.duration.unwrap_or(DEFAULT_DURATION_SECS);
    validate_new_video(
        &input.title,
        &input.description,
        &input.text_prompt,
        input.negative_prompt.as_deref(),
        duration_secs,
    )?;

    let resolution = match input.resolution.as_deref() {
        Some(raw) => raw.parse::<Resolution>()?,
        None => Resolution::default(),
    };
    let aspect_ratio = input
        .aspect_ratio
        .as_deref()
        .map(AspectRatio::parse_or_default)
        .unwrap_or_default();

    Ok(CreateVideo {
        user_id: input.user_id,
        title: input.title.trim().to_string(),
        description: input.description,
        text_prompt: input.text_prompt.trim().to_string(),
        negative_prompt: input.negative_prompt.filter(|n| !n.trim().is_empty()),
        style: input.style.filter(|s| !s.trim().is_empty()),
        resolution,
        aspect_ratio,
        duration_secs,
    })
}

async fn find_video(pool: &sqlx::PgPool, id: VideoId) -> AppResult<Video> {
    VideoRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))
}

async fn insert(state: &AppState, create: CreateVideo) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::create(&state.pool, &create).await?;

    tracing::info!(
        video_id = %video.id,
        user_id = %video.user_id,
        resolution = %create.resolution,
        aspect_ratio = %create.aspect_ratio,
        duration_secs = video.duration_secs,
        "Video job created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: VideoResponse::from(video),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Create a Pending video job. Returns 201 with the projected record.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<impl IntoResponse> {
    let create = build_create(input)?;
    insert(&state, create).await
}

/// POST /api/v1/videos/quick
///
/// Low-cost preset: always 480p, duration capped at three seconds.
pub async fn create_quick_video(
    State(state): State<AppState>,
    Json(mut input): Json<CreateVideoRequest>,
) -> AppResult<impl IntoResponse> {
    input.resolution = None;
    let mut create = build_create(input)?;
    create.resolution = Resolution::Sd480p;
    create.duration_secs = create.duration_secs.min(QUICK_MAX_DURATION_SECS);
    insert(&state, create).await
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> AppResult<impl IntoResponse> {
    let video = find_video(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: VideoResponse::from(video),
    }))
}

/// GET /api/v1/videos/{id}/status
///
/// Stage, progress percentage and message only.
pub async fn get_video_status(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> AppResult<impl IntoResponse> {
    let video = find_video(&state.pool, id).await?;
    let projection = project_status_id(video.status_id);
    Ok(Json(DataResponse {
        data: VideoStatusResponse {
            id: video.id,
            status: status_name(video.status_id),
            progress: projection.progress,
            message: projection.message,
        },
    }))
}

/// GET /api/v1/videos/user/{user_id}?page=&page_size=
///
/// Newest first. `page` is 1-based; `page_size` is clamped by the repository.
pub async fn list_user_videos(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page < 1 {
        return Err(AppError::BadRequest("page must be at least 1".into()));
    }

    let videos = VideoRepo::list_by_user(&state.pool, user_id, page, page_size).await?;
    let total = VideoRepo::count_by_user(&state.pool, user_id).await?;

    Ok(Json(DataResponse {
        data: Page {
            items: videos.into_iter().map(VideoResponse::from).collect(),
            page,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            total,
        },
    }))
}
