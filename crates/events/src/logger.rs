//! Background subscriber that writes every [`VideoEvent`] to the trace log.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::bus::{VideoEvent, VideoEventKind};

pub struct EventLogger {
    receiver: broadcast::Receiver<VideoEvent>,
}

impl EventLogger {
    pub fn new(receiver: broadcast::Receiver<VideoEvent>) -> Self {
        Self { receiver }
    }

    /// Run until cancelled or until every sender is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event logger cancelled");
                    break;
                }
                received = self.receiver.recv() => match received {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event logger lagged behind");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Event bus closed");
                        break;
                    }
                },
            }
        }
    }
}

fn log_event(event: &VideoEvent) {
    match &event.kind {
        VideoEventKind::StageChanged { from, to } => {
            tracing::info!(video_id = %event.video_id, from, to, "Video stage changed");
        }
        VideoEventKind::Completed { video_url } => {
            tracing::info!(video_id = %event.video_id, video_url, "Video completed");
        }
        VideoEventKind::Failed { message } => {
            tracing::warn!(video_id = %event.video_id, message, "Video failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ecomvideo_core::types::VideoId;

    use super::*;
    use crate::bus::EventBus;

    #[tokio::test]
    async fn stops_when_cancelled() {
        let bus = EventBus::default();
        let logger = EventLogger::new(bus.subscribe());
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(logger.run(cancel.clone()));
        bus.publish(VideoEvent::completed(VideoId::nil(), "https://cdn.example/v.mp4"));
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should stop promptly")
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_bus_dropped() {
        let bus = EventBus::default();
        let logger = EventLogger::new(bus.subscribe());
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), logger.run(CancellationToken::new()))
            .await
            .expect("logger should stop once the bus is gone");
    }
}
