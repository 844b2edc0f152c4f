use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

use reelsmith_core::{GenerationOperation, ReferenceImage, VideoReference, VideoSettings};

/// Most reference images the service accepts in one generation request
pub const MAX_REFERENCE_IMAGES: usize = 3;

/// Operations the assembly loop needs from a video generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync + Debug {
    /// Start a fresh clip grounded on up to [`MAX_REFERENCE_IMAGES`] images
    async fn start_generation(
        &self,
        prompt: &str,
        reference_images: &[ReferenceImage],
        settings: &VideoSettings,
    ) -> Result<GenerationOperation>;

    /// Start a clip that continues `previous_video`. `settings` must match the
    /// ones the previous clip was generated with.
    async fn start_extension(
        &self,
        prompt: &str,
        previous_video: &VideoReference,
        settings: &VideoSettings,
    ) -> Result<GenerationOperation>;

    /// Refresh an operation's status. Finished operations are returned as-is.
    async fn poll_operation(&self, operation: &GenerationOperation) -> Result<GenerationOperation>;

    /// URL a player can fetch the clip from
    fn playback_url(&self, video: &VideoReference) -> Result<String>;
}
