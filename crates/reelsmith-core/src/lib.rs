//! Reelsmith Core Library
//!
//! Domain models, error types, configuration and image handling shared by the
//! generation client, the assembly orchestrator and the command-line front end.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod selection;

// Re-export commonly used types
pub use codec::ImageCodec;
pub use config::{Config, PlaybackUrlPolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    GenerationOperation, GenerationProgress, GenerationStatus, ReferenceImage, UploadedImage,
    VideoReference, VideoSettings,
};
pub use selection::{ImageSelection, DEFAULT_MAX_IMAGES};
