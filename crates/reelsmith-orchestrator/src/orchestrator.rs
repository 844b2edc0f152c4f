use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AssemblyConfig;
use crate::lease::RunLease;
use crate::poll::{cancellable, wait_until_done};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::prompt::{extension_prompt, initial_prompt};
use reelsmith_client::GenerationClient;
use reelsmith_core::{
    AppError, ErrorMetadata, GenerationProgress, GenerationStatus, LogLevel, ReferenceImage,
    UploadedImage, VideoReference,
};

/// Drives one marketing video from screenshots to a playable URL.
///
/// At most one run is in flight per orchestrator; a second concurrent call
/// fails with [`AppError::RunInProgress`].
pub struct VideoAssemblyOrchestrator {
    client: Arc<dyn GenerationClient>,
    config: AssemblyConfig,
    run_gate: Arc<Semaphore>,
}

/// State owned by a single run, dropped when it ends
#[derive(Debug, Default)]
struct RunState {
    accumulated_secs: f64,
    segment_count: u32,
    current_video: Option<VideoReference>,
}

impl VideoAssemblyOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>, config: AssemblyConfig) -> Self {
        Self {
            client,
            config,
            run_gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.run_gate.available_permits() == 0
    }

    /// Reserve the run slot ahead of time, e.g. to disable a trigger while
    /// inputs are still being prepared.
    pub fn try_lease(&self) -> Result<RunLease, AppError> {
        RunLease::try_acquire(&self.run_gate)
    }

    /// Generate a video. `Ok(None)` means the run failed; the cause was
    /// reported through an `error` progress snapshot.
    pub async fn generate(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Option<String>, AppError> {
        self.generate_with_cancel(images, prompt, sink, CancellationToken::new())
            .await
    }

    pub async fn generate_with_cancel(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        sink: &dyn ProgressSink,
        cancel: CancellationToken,
    ) -> Result<Option<String>, AppError> {
        validate_inputs(images, prompt)?;
        let lease = self.try_lease()?;
        self.generate_leased(lease, images, prompt, sink, cancel)
            .await
    }

    /// Generate a video under a lease obtained from [`Self::try_lease`].
    pub async fn generate_leased(
        &self,
        lease: RunLease,
        images: &[UploadedImage],
        prompt: &str,
        sink: &dyn ProgressSink,
        cancel: CancellationToken,
    ) -> Result<Option<String>, AppError> {
        if !lease.is_for(&self.run_gate) {
            return Err(AppError::InvalidInput(
                "run lease belongs to a different orchestrator".to_string(),
            ));
        }
        validate_inputs(images, prompt)?;

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("generation_run", %run_id, images = images.len());
        let url = self
            .run(images, prompt, sink, &cancel)
            .instrument(span)
            .await;

        drop(lease);
        Ok(url)
    }

    /// Everything past input validation. Failures end here as an `error` snapshot.
    async fn run(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Option<String> {
        let max_segments = self.config.max_segments();
        let mut reporter = ProgressReporter::new(sink);
        let mut state = RunState::default();

        match self
            .assemble(images, prompt, &mut reporter, &mut state, cancel)
            .await
        {
            Ok(url) => Some(url),
            Err(err) => {
                match err.log_level() {
                    LogLevel::Debug => tracing::debug!(
                        error = %err,
                        segments = state.segment_count,
                        "Video generation stopped"
                    ),
                    LogLevel::Warn => tracing::warn!(
                        error = %err,
                        segments = state.segment_count,
                        "Video generation stopped"
                    ),
                    LogLevel::Error => tracing::error!(
                        error = %err,
                        code = err.error_code(),
                        recoverable = err.is_recoverable(),
                        segments = state.segment_count,
                        accumulated_secs = state.accumulated_secs,
                        "Video generation failed"
                    ),
                }
                reporter.emit(GenerationProgress {
                    status: GenerationStatus::Error,
                    message: format!("Video generation failed: {}", err),
                    current_segment: state.segment_count,
                    total_segments: max_segments,
                });
                None
            }
        }
    }

    async fn assemble(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        reporter: &mut ProgressReporter<'_>,
        state: &mut RunState,
        cancel: &CancellationToken,
    ) -> Result<String, AppError> {
        let config = &self.config;
        let max_segments = config.max_segments();
        let client = self.client.as_ref();

        reporter.emit(GenerationProgress {
            status: GenerationStatus::GeneratingInitial,
            message: format!(
                "Initiating video generation (segment {}/{})...",
                state.segment_count + 1,
                max_segments
            ),
            current_segment: state.segment_count,
            total_segments: max_segments,
        });

        let reference_images: Vec<ReferenceImage> = images
            .iter()
            .take(config.max_reference_images)
            .map(UploadedImage::to_reference)
            .collect();
        let prompt_text = initial_prompt(images.len(), prompt);

        tracing::info!(
            reference_images = reference_images.len(),
            max_segments,
            target_secs = config.target_duration_secs,
            "Starting initial video generation"
        );

        let operation = cancellable(
            cancel,
            client.start_generation(&prompt_text, &reference_images, &config.video_settings),
        )
        .await??;
        let operation = wait_until_done(client, operation, &config.poll, cancel, 1).await?;

        let video = match operation.first_video() {
            Some(video) => video.clone(),
            None => {
                if let Some(failure) = operation.failure() {
                    tracing::warn!(operation = %operation.name(), failure, "Initial operation reported a failure");
                }
                return Err(AppError::NoInitialResult);
            }
        };
        state.accumulated_secs = video.duration_seconds.filter(|d| *d > 0.0).unwrap_or(0.0);
        state.segment_count += 1;
        tracing::info!(
            accumulated_secs = state.accumulated_secs,
            uri = %video.uri,
            "Initial video generated"
        );
        state.current_video = Some(video);

        while state.accumulated_secs < config.target_duration_secs
            && state.segment_count < max_segments
        {
            let segment = state.segment_count + 1;
            reporter.emit(GenerationProgress {
                status: GenerationStatus::Extending,
                message: format!(
                    "Extending video (segment {}/{}). Current duration: {:.1}s",
                    segment, max_segments, state.accumulated_secs
                ),
                current_segment: state.segment_count,
                total_segments: max_segments,
            });

            let previous = state
                .current_video
                .as_ref()
                .ok_or_else(|| AppError::Internal("no video to extend".to_string()))?;
            let prompt_text = extension_prompt(images.len(), prompt);

            let operation = cancellable(
                cancel,
                client.start_extension(&prompt_text, previous, &config.video_settings),
            )
            .await??;
            let operation = wait_until_done(client, operation, &config.poll, cancel, segment).await?;

            let video = match operation.first_video() {
                Some(video) => video.clone(),
                None => {
                    if let Some(failure) = operation.failure() {
                        tracing::warn!(operation = %operation.name(), segment, failure, "Extension operation reported a failure");
                    }
                    return Err(AppError::ExtensionFailed { segment });
                }
            };

            state.accumulated_secs = next_accumulated(
                state.accumulated_secs,
                video.duration_seconds,
                config.extension_estimate_secs,
            );
            state.segment_count += 1;
            tracing::info!(
                segment = state.segment_count,
                accumulated_secs = state.accumulated_secs,
                uri = %video.uri,
                "Video segment generated"
            );
            state.current_video = Some(video);
        }

        let final_video = state
            .current_video
            .as_ref()
            .ok_or_else(|| AppError::Internal("run finished without a video".to_string()))?;
        let url = client.playback_url(final_video)?;

        reporter.emit(GenerationProgress {
            status: GenerationStatus::Complete,
            message: format!(
                "Video generation complete! Total duration: {:.1}s",
                state.accumulated_secs
            ),
            current_segment: state.segment_count,
            total_segments: max_segments,
        });
        tracing::info!(
            segments = state.segment_count,
            accumulated_secs = state.accumulated_secs,
            "Video generation complete"
        );

        Ok(url)
    }
}

/// Running total after an extension: the reported duration when the service
/// gives one, otherwise the previous total plus the fixed estimate.
///
/// A reported total below the previous one is not taken as is: the previous
/// total is kept so the running total never goes backwards.
fn next_accumulated(previous: f64, reported: Option<f64>, estimate: f64) -> f64 {
    match reported.filter(|d| *d > 0.0) {
        Some(reported) if reported < previous => {
            tracing::warn!(previous, reported, "Service reported a shorter video than before, keeping previous total");
            previous
        }
        Some(reported) => reported,
        None => previous + estimate,
    }
}

fn validate_inputs(images: &[UploadedImage], prompt: &str) -> Result<(), AppError> {
    if images.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one image is required".to_string(),
        ));
    }
    if prompt.trim().is_empty() {
        return Err(AppError::InvalidInput("prompt must not be blank".to_string()));
    }
    Ok(())
}
