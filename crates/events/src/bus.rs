//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Shared via `Arc<EventBus>`. Publishing never blocks and never fails.

use chrono::{DateTime, Utc};
use ecomvideo_core::types::VideoId;
use ecomvideo_core::video::VideoStatus;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// VideoEvent
// ---------------------------------------------------------------------------

/// What happened to a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoEventKind {
    /// A non-terminal stage change (e.g. Pending -> GeneratingImage).
    StageChanged {
        from: &'static str,
        to: &'static str,
    },
    Completed {
        video_url: String,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoEvent {
    pub video_id: VideoId,
    #[serde(flatten)]
    pub kind: VideoEventKind,
    pub timestamp: DateTime<Utc>,
}

impl VideoEvent {
    pub fn stage_changed(video_id: VideoId, from: VideoStatus, to: VideoStatus) -> Self {
        Self::new(
            video_id,
            VideoEventKind::StageChanged {
                from: from.as_str(),
                to: to.as_str(),
            },
        )
    }

    pub fn completed(video_id: VideoId, video_url: impl Into<String>) -> Self {
        Self::new(
            video_id,
            VideoEventKind::Completed {
                video_url: video_url.into(),
            },
        )
    }

    pub fn failed(video_id: VideoId, message: impl Into<String>) -> Self {
        Self::new(
            video_id,
            VideoEventKind::Failed {
                message: message.into(),
            },
        )
    }

    fn new(video_id: VideoId, kind: VideoEventKind) -> Self {
        Self {
            video_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest unread events are dropped and slow
/// receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<VideoEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: VideoEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VideoEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
