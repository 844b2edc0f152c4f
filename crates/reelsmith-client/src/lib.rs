//! Adapter around the external generative-video service.
//!
//! [`GenerationClient`] is the seam the orchestrator depends on; [`VeoClient`]
//! implements it against the Gemini long-running video API.

mod client;
mod playback;
mod veo;

pub use client::{GenerationClient, MAX_REFERENCE_IMAGES};
pub use playback::playback_url;
pub use veo::VeoClient;
