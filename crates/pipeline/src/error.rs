use ecomvideo_core::generation::ProviderError;
use ecomvideo_core::types::VideoId;

/// Unexpected failure while advancing one video.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Video {0} no longer exists")]
    Missing(VideoId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
