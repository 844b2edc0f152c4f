use std::path::PathBuf;

use serde::Serialize;

use reelsmith_core::{Config, GenerationProgress, ImageCodec, ImageSelection};
use reelsmith_orchestrator::{initial_prompt, AssemblyConfig};

#[derive(Debug, Serialize)]
pub struct PlannedImage {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// Sent to the service as a reference image
    pub reference: bool,
}

/// What the first segment would send, and the segment budget of the run
#[derive(Debug, Serialize)]
pub struct Plan {
    pub images: Vec<PlannedImage>,
    pub prompt: String,
    pub max_segments: u32,
    pub target_duration_secs: f64,
}

/// Encode `paths` in order into a selection capped at `max_images`.
///
/// Files that cannot be read are left out with a warning; files beyond the
/// cap are dropped.
pub async fn load_selection(paths: &[PathBuf], max_images: usize) -> ImageSelection {
    let mut selection = ImageSelection::new(max_images);
    for path in paths.iter().take(max_images) {
        let image = ImageCodec::encode_file(path).await;
        if !image.is_available() {
            tracing::warn!(path = %path.display(), "Skipping unreadable image");
            continue;
        }
        selection.add(vec![image]);
    }
    if paths.len() > max_images {
        tracing::warn!(
            given = paths.len(),
            max_images,
            "Too many images, only the first ones are used"
        );
    }
    selection
}

pub fn build_plan(
    selection: &ImageSelection,
    prompt: &str,
    config: &Config,
) -> anyhow::Result<Plan> {
    if prompt.trim().is_empty() {
        anyhow::bail!("Please provide a video prompt");
    }
    config.validate_settings()?;

    let assembly = AssemblyConfig::from(config);
    let images = selection
        .images()
        .iter()
        .enumerate()
        .map(|(index, image)| PlannedImage {
            name: image.name.clone(),
            mime_type: image.mime_type.clone(),
            size_bytes: image.bytes.len(),
            reference: index < assembly.max_reference_images,
        })
        .collect();

    Ok(Plan {
        images,
        prompt: initial_prompt(selection.len(), prompt),
        max_segments: assembly.max_segments(),
        target_duration_secs: assembly.target_duration_secs,
    })
}

/// One-line rendering of a progress snapshot, e.g. `[extending 3/9] ...`
pub fn format_progress(progress: &GenerationProgress) -> String {
    if progress.total_segments == 0 {
        return format!("[{}] {}", progress.status, progress.message);
    }
    format!(
        "[{} {}/{}] {}",
        progress.status, progress.current_segment, progress.total_segments, progress.message
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
