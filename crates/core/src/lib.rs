//! Domain types shared by every crate in the workspace.
//!
//! Holds the video vocabulary (resolution, aspect ratio, status), request
//! validation, the client-facing status projection, and the provider-neutral
//! generation task model that the pipeline drives.

pub mod error;
pub mod generation;
pub mod status;
pub mod types;
pub mod video;
