//! Data model shared by the client, the orchestrator and front ends.

mod image;
mod operation;
mod progress;

pub use image::{ReferenceImage, UploadedImage};
pub use operation::{GenerationOperation, VideoReference, VideoSettings};
pub use progress::{GenerationProgress, GenerationStatus};
