//! Client-facing status projection.
//!
//! Maps a stored status to the progress percentage and human-readable
//! message returned by the status endpoints. Pure; no I/O.

use serde::Serialize;

use crate::video::{StatusId, VideoStatus};

/// Progress and message shown to clients for a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusProjection {
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub message: &'static str,
}

const FALLBACK: StatusProjection = StatusProjection {
    progress: 0,
    message: "Processing your request...",
};

pub fn project(status: VideoStatus) -> StatusProjection {
    let (progress, message) = match status {
        VideoStatus::Pending => (10, "Preparing your video..."),
        VideoStatus::GeneratingImage => (30, "Creating image from your prompt..."),
        VideoStatus::GeneratingVideo => (60, "Generating video from image..."),
        VideoStatus::Processing => (80, "Finalizing your video..."),
        VideoStatus::Completed => (100, "Video generation completed!"),
        VideoStatus::Failed => (0, "Video generation failed"),
        VideoStatus::Cancelled => return FALLBACK,
    };
    StatusProjection { progress, message }
}

/// Project a raw stored status ID. Unknown IDs get the fallback projection.
pub fn project_status_id(id: StatusId) -> StatusProjection {
    VideoStatus::from_id(id).map(project).unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_table() {
        let cases = [
            (VideoStatus::Pending, 10),
            (VideoStatus::GeneratingImage, 30),
            (VideoStatus::GeneratingVideo, 60),
            (VideoStatus::Processing, 80),
            (VideoStatus::Completed, 100),
            (VideoStatus::Failed, 0),
            (VideoStatus::Cancelled, 0),
        ];
        for (status, expected) in cases {
            assert_eq!(project(status).progress, expected, "{status}");
        }
    }

    #[test]
    fn messages() {
        assert_eq!(project(VideoStatus::Pending).message, "Preparing your video...");
        assert_eq!(
            project(VideoStatus::Completed).message,
            "Video generation completed!"
        );
        assert_eq!(project(VideoStatus::Failed).message, "Video generation failed");
        assert_eq!(
            project(VideoStatus::Cancelled).message,
            "Processing your request..."
        );
    }

    #[test]
    fn unknown_status_id_falls_back() {
        let projection = project_status_id(99);
        assert_eq!(projection.progress, 0);
        assert_eq!(projection.message, "Processing your request...");
    }
}
