//! Freepik generation provider.
//!
//! Wraps the Mystic text-to-image and Kling v2 image-to-video endpoints,
//! normalizes their response envelopes, and exposes the result as an
//! [`ecomvideo_core::generation::GenerationProvider`].

pub mod api;
pub mod client;
pub mod config;
pub mod messages;

pub use client::FreepikClient;
pub use config::FreepikConfig;
