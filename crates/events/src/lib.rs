//! In-process notifications for video pipeline transitions.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`VideoEvent`]: what the pipeline announces when a job moves.
//! - [`EventLogger`]: subscriber that writes every event to the trace log.

pub mod bus;
pub mod logger;

pub use bus::{EventBus, VideoEvent, VideoEventKind};
pub use logger::EventLogger;
