//! Repository for the `videos` table.

use ecomvideo_core::types::{UserId, VideoId};
use ecomvideo_core::video::{StatusId, VideoStatus, INPUT_TYPE_TEXT};
use sqlx::PgPool;

use crate::models::video::{CreateVideo, Video};

/// Column list for `videos` queries.
const COLUMNS: &str = "\
    id, user_id, title, description, text_prompt, negative_prompt, style, \
    input_type, resolution, aspect_ratio, duration_secs, status_id, \
    image_task_id, video_task_id, image_url, video_url, thumbnail_url, \
    file_size_bytes, error_message, created_at, updated_at, completed_at";

/// Maximum page size for per-user listing.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for per-user listing.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new job in `Pending`.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos \
                (user_id, title, description, text_prompt, negative_prompt, style, \
                 input_type, resolution, aspect_ratio, duration_secs, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.text_prompt)
            .bind(&input.negative_prompt)
            .bind(&input.style)
            .bind(INPUT_TYPE_TEXT)
            .bind(input.resolution.as_str())
            .bind(input.aspect_ratio.as_str())
            .bind(input.duration_secs)
            .bind(VideoStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: VideoId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up the video that owns a provider image task.
    pub async fn find_by_image_task_id(
        pool: &PgPool,
        task_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE image_task_id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// Look up the video that owns a provider video task.
    pub async fn find_by_video_task_id(
        pool: &PgPool,
        task_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE video_task_id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// All videos whose status is in `statuses`, oldest first.
    pub async fn list_by_statuses(
        pool: &PgPool,
        statuses: &[StatusId],
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos \
             WHERE status_id = ANY($1) \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(statuses)
            .fetch_all(pool)
            .await
    }

    /// One page of a user's videos, newest first. `page` is 1-based.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = page.max(1).saturating_sub(1).saturating_mul(page_size);
        let query = format!(
            "SELECT {COLUMNS} FROM videos \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(user_id)
            .bind(page_size)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM videos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Persist every pipeline-mutable column of `video`.
    ///
    /// Returns `true` if the row existed. Writing the same values twice is
    /// harmless.
    pub async fn update(pool: &PgPool, video: &Video) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET \
                status_id = $2, image_task_id = $3, video_task_id = $4, \
                image_url = $5, video_url = $6, thumbnail_url = $7, \
                file_size_bytes = $8, error_message = $9, \
                updated_at = $10, completed_at = $11 \
             WHERE id = $1",
        )
        .bind(video.id)
        .bind(video.status_id)
        .bind(&video.image_task_id)
        .bind(&video.video_task_id)
        .bind(&video.image_url)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.file_size_bytes)
        .bind(&video.error_message)
        .bind(video.updated_at)
        .bind(video.completed_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
