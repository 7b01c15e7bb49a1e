//! Periodic loop that advances every in-flight video.
//!
//! Each tick loads all Pending / GeneratingImage / GeneratingVideo videos,
//! runs one [`VideoPipeline`] step on each in order, then persists the
//! videos that changed in a single batch. A failure on one video is
//! recorded on that video and never stops the tick.

use std::sync::Arc;

use ecomvideo_core::generation::GenerationProvider;
use ecomvideo_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::config::SchedulerConfig;
use crate::machine::{StepOutcome, VideoPipeline};
use crate::store::VideoStore;

/// Counters for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fetched: usize,
    pub advanced: usize,
    pub unchanged: usize,
    /// Videos whose step returned an error and were marked failed.
    pub failed_in_isolation: usize,
    pub flush_errors: usize,
    /// Loading in-flight videos failed; nothing was processed.
    pub fetch_failed: bool,
    /// Cancellation was observed before every video was processed.
    pub cancelled: bool,
}

pub struct PollingScheduler {
    store: Arc<dyn VideoStore>,
    pipeline: VideoPipeline,
    config: SchedulerConfig,
}

impl PollingScheduler {
    pub fn new(
        store: Arc<dyn VideoStore>,
        provider: Arc<dyn GenerationProvider>,
        events: Arc<EventBus>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            pipeline: VideoPipeline::new(provider, events),
            config,
        }
    }

    /// Run ticks until `cancel` fires. The first tick starts immediately;
    /// each later tick starts one full interval after the previous tick's
    /// flush finished.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Video processing scheduler started"
        );

        loop {
            let report = self.tick(&cancel).await;
            log_report(&report);
            if report.cancelled {
                tracing::info!("Video processing scheduler cancelled mid-tick");
                break;
            }

            // Wait before the next tick, respecting cancellation.
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Video processing scheduler cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    /// Process every in-flight video once.
    pub async fn tick(&self, cancel: &CancellationToken) -> TickReport {
        let mut report = TickReport::default();

        let videos = match self.store.list_in_flight().await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load in-flight videos");
                report.fetch_failed = true;
                return report;
            }
        };
        report.fetched = videos.len();

        let mut dirty = Vec::new();
        for mut video in videos {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                result = self.pipeline.advance(&mut video) => result,
            };

            match result {
                Ok(StepOutcome::Transitioned { .. }) => {
                    report.advanced += 1;
                    dirty.push(video);
                }
                Ok(StepOutcome::Unchanged | StepOutcome::Skipped) => report.unchanged += 1,
                Err(e) => {
                    tracing::error!(video_id = %video.id, error = %e, "Error processing video");
                    self.pipeline
                        .fail(&mut video, format!("Processing failed: {e}"));
                    report.failed_in_isolation += 1;
                    dirty.push(video);
                }
            }
        }

        if !dirty.is_empty() {
            let saved = self.store.save_batch(&dirty).await;
            for (video_id, e) in &saved.failures {
                tracing::error!(video_id = %video_id, error = %e, "Failed to persist video");
            }
            report.flush_errors = saved.failures.len();
        }

        report
    }
}

fn log_report(report: &TickReport) {
    if report.fetched == 0 {
        tracing::debug!("No videos in flight");
        return;
    }
    tracing::info!(
        fetched = report.fetched,
        advanced = report.advanced,
        unchanged = report.unchanged,
        failed = report.failed_in_isolation,
        flush_errors = report.flush_errors,
        "Video processing tick finished"
    );
}
