//! Video generation pipeline.
//!
//! - [`stage`]: typed view of a video row's pipeline position.
//! - [`machine`]: one state-machine step per video, driven through a
//!   [`GenerationProvider`](ecomvideo_core::generation::GenerationProvider).
//! - [`store`]: persistence seam consumed by the scheduler.
//! - [`scheduler`]: periodic loop that advances every in-flight video.

pub mod config;
pub mod error;
pub mod machine;
pub mod scheduler;
pub mod stage;
pub mod store;

pub use config::SchedulerConfig;
pub use error::{PipelineError, StoreError};
pub use machine::{StepOutcome, VideoPipeline};
pub use scheduler::{PollingScheduler, TickReport};
pub use stage::{Stage, StageError};
pub use store::{BatchSaveReport, PgVideoStore, VideoStore};
