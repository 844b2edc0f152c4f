//! Test helpers for orchestrator integration tests
//!
//! [`ScriptedClient`] replays one scripted outcome per segment without any
//! network access; [`ProgressRecorder`] keeps every snapshot a run emits.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use reelsmith_client::{playback_url, GenerationClient};
use reelsmith_core::{
    GenerationOperation, GenerationProgress, GenerationStatus, ImageCodec, PlaybackUrlPolicy,
    ReferenceImage, UploadedImage, VideoReference, VideoSettings,
};
use reelsmith_orchestrator::{AssemblyConfig, ProgressSink, VideoAssemblyOrchestrator};

pub const TEST_KEY: &str = "test-key";

/// What the service does for one segment
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Finishes with a video, optionally reporting its duration
    Video { duration: Option<f64> },
    /// Finishes without any generated video
    NoVideo,
    /// The start request itself fails
    StartFails(String),
    /// Never reports done
    NeverDone,
}

pub fn video(duration: f64) -> Outcome {
    Outcome::Video {
        duration: Some(duration),
    }
}

pub fn video_without_duration() -> Outcome {
    Outcome::Video { duration: None }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Generate {
        prompt: String,
        reference_images: Vec<ReferenceImage>,
        settings: VideoSettings,
    },
    Extend {
        prompt: String,
        previous_uri: String,
        settings: VideoSettings,
    },
    Poll {
        name: String,
    },
}

#[derive(Debug)]
struct ScriptedOperation {
    segment: u32,
    remaining_polls: u32,
    outcome: Outcome,
}

#[derive(Debug, Default)]
struct ClientState {
    calls: Vec<Call>,
    started: u32,
    operations: HashMap<String, ScriptedOperation>,
}

#[derive(Debug)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Outcome>>,
    pending_polls: u32,
    state: Mutex<ClientState>,
}

pub fn segment_uri(segment: u32) -> String {
    format!("https://files.example.com/segment-{}:download?alt=media", segment)
}

impl ScriptedClient {
    /// Every operation needs one status refresh before it is done
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self::with_pending_polls(outcomes, 1)
    }

    pub fn with_pending_polls(outcomes: Vec<Outcome>, pending_polls: u32) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            pending_polls,
            state: Mutex::new(ClientState::default()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn generate_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Generate { .. }))
            .collect()
    }

    pub fn extend_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Extend { .. }))
            .collect()
    }

    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Poll { .. }))
            .count()
    }

    fn start(&self, call: Call) -> Result<GenerationOperation> {
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted client ran out of outcomes");

        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.started += 1;
        let segment = state.started;
        let name = format!("operations/{}", segment);

        if let Outcome::StartFails(message) = &outcome {
            anyhow::bail!("{}", message);
        }

        if self.pending_polls == 0 && outcome != Outcome::NeverDone {
            return Ok(finished(&name, segment, &outcome));
        }

        state.operations.insert(
            name.clone(),
            ScriptedOperation {
                segment,
                remaining_polls: self.pending_polls,
                outcome,
            },
        );
        Ok(GenerationOperation::Pending { name })
    }
}

fn finished(name: &str, segment: u32, outcome: &Outcome) -> GenerationOperation {
    match outcome {
        Outcome::Video { duration } => GenerationOperation::Done {
            name: name.to_string(),
            videos: vec![VideoReference {
                uri: segment_uri(segment),
                duration_seconds: *duration,
            }],
            failure: None,
        },
        _ => GenerationOperation::Done {
            name: name.to_string(),
            videos: vec![],
            failure: Some("content was blocked".to_string()),
        },
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn start_generation(
        &self,
        prompt: &str,
        reference_images: &[ReferenceImage],
        settings: &VideoSettings,
    ) -> Result<GenerationOperation> {
        self.start(Call::Generate {
            prompt: prompt.to_string(),
            reference_images: reference_images.to_vec(),
            settings: settings.clone(),
        })
    }

    async fn start_extension(
        &self,
        prompt: &str,
        previous_video: &VideoReference,
        settings: &VideoSettings,
    ) -> Result<GenerationOperation> {
        self.start(Call::Extend {
            prompt: prompt.to_string(),
            previous_uri: previous_video.uri.clone(),
            settings: settings.clone(),
        })
    }

    async fn poll_operation(&self, operation: &GenerationOperation) -> Result<GenerationOperation> {
        let mut state = self.state.lock().unwrap();
        let name = operation.name().to_string();
        state.calls.push(Call::Poll { name: name.clone() });

        if operation.is_done() {
            return Ok(operation.clone());
        }

        let scripted = state
            .operations
            .get_mut(&name)
            .ok_or_else(|| anyhow::anyhow!("unknown operation {}", name))?;

        if scripted.outcome == Outcome::NeverDone {
            return Ok(GenerationOperation::Pending { name });
        }

        scripted.remaining_polls = scripted.remaining_polls.saturating_sub(1);
        if scripted.remaining_polls == 0 {
            Ok(finished(&name, scripted.segment, &scripted.outcome))
        } else {
            Ok(GenerationOperation::Pending { name })
        }
    }

    fn playback_url(&self, video: &VideoReference) -> Result<String> {
        playback_url(&video.uri, TEST_KEY, PlaybackUrlPolicy::EmbedCredential)
    }
}

/// Keeps every progress snapshot in emission order
#[derive(Debug, Default)]
pub struct ProgressRecorder {
    events: Mutex<Vec<GenerationProgress>>,
}

impl ProgressRecorder {
    pub fn events(&self) -> Vec<GenerationProgress> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<GenerationStatus> {
        self.events().into_iter().map(|p| p.status).collect()
    }

    pub fn count(&self, status: GenerationStatus) -> usize {
        self.statuses().into_iter().filter(|s| *s == status).count()
    }

    pub fn last(&self) -> GenerationProgress {
        self.events().last().cloned().expect("no progress recorded")
    }
}

impl ProgressSink for ProgressRecorder {
    fn on_progress(&self, progress: GenerationProgress) {
        self.events.lock().unwrap().push(progress);
    }
}

pub fn images(count: usize) -> Vec<UploadedImage> {
    (0..count)
        .map(|i| {
            ImageCodec::encode(
                format!("screen-{}.png", i),
                Bytes::from(format!("pixels-{}", i).into_bytes()),
                "image/png",
            )
        })
        .collect()
}

pub fn orchestrator(client: &Arc<ScriptedClient>) -> VideoAssemblyOrchestrator {
    orchestrator_with(client, AssemblyConfig::default())
}

pub fn orchestrator_with(
    client: &Arc<ScriptedClient>,
    config: AssemblyConfig,
) -> VideoAssemblyOrchestrator {
    let client: Arc<dyn GenerationClient> = client.clone();
    VideoAssemblyOrchestrator::new(client, config)
}
