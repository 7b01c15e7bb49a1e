//! Persistence seam between the scheduler and the `videos` table.

use async_trait::async_trait;
use ecomvideo_core::types::VideoId;
use ecomvideo_core::video::{StatusId, IN_FLIGHT_STATUSES};
use ecomvideo_db::models::video::Video;
use ecomvideo_db::repositories::VideoRepo;
use ecomvideo_db::DbPool;

use crate::error::StoreError;

/// Outcome of [`VideoStore::save_batch`]. Each video is saved on its own;
/// one failure does not roll back the others.
#[derive(Debug, Default)]
pub struct BatchSaveReport {
    pub saved: usize,
    pub failures: Vec<(VideoId, StoreError)>,
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Every video in Pending, GeneratingImage or GeneratingVideo, oldest first.
    async fn list_in_flight(&self) -> Result<Vec<Video>, StoreError>;

    async fn save_batch(&self, videos: &[Video]) -> BatchSaveReport;
}

/// [`VideoStore`] over PostgreSQL.
pub struct PgVideoStore {
    pool: DbPool,
}

impl PgVideoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn list_in_flight(&self) -> Result<Vec<Video>, StoreError> {
        let statuses: Vec<StatusId> = IN_FLIGHT_STATUSES.iter().map(|s| s.id()).collect();
        Ok(VideoRepo::list_by_statuses(&self.pool, &statuses).await?)
    }

    async fn save_batch(&self, videos: &[Video]) -> BatchSaveReport {
        let mut report = BatchSaveReport::default();
        for video in videos {
            match VideoRepo::update(&self.pool, video).await {
                Ok(true) => report.saved += 1,
                Ok(false) => report.failures.push((video.id, StoreError::Missing(video.id))),
                Err(e) => report.failures.push((video.id, e.into())),
            }
        }
        report
    }
}
