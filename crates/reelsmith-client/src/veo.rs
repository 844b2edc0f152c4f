//! Gemini Veo client
//!
//! Videos are produced by long-running operations: `predictLongRunning` returns
//! an operation name, which is then fetched until it reports `done`.
//! Extensions use the same endpoint with the previous clip passed as `video`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::client::{GenerationClient, MAX_REFERENCE_IMAGES};
use crate::playback::playback_url;
use reelsmith_core::{
    Config, GenerationOperation, PlaybackUrlPolicy, ReferenceImage, VideoReference, VideoSettings,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const REFERENCE_TYPE_ASSET: &str = "asset";

/// Client for the Veo video generation models
pub struct VeoClient {
    http_client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    playback_url_policy: PlaybackUrlPolicy,
}

impl Debug for VeoClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VeoClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

// Gemini API request structures
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Instance<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reference_images: Vec<WireReferenceImage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<WireVideoInput<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireReferenceImage<'a> {
    image: WireImage<'a>,
    reference_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImage<'a> {
    bytes_base64_encoded: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
struct WireVideoInput<'a> {
    uri: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    aspect_ratio: &'a str,
    resolution: &'a str,
    sample_count: u32,
}

// Gemini API response structures
#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    response: Option<OperationResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<WireVideoOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVideoOutput {
    uri: Option<String>,
    duration_seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

impl From<OperationResponse> for GenerationOperation {
    fn from(op: OperationResponse) -> Self {
        if !op.done {
            return GenerationOperation::Pending { name: op.name };
        }

        // A sample without a URI hides every sample after it: only the first
        // video is ever consumed and it must be the service's first.
        let videos = op
            .response
            .and_then(|r| r.generate_video_response)
            .map(|r| r.generated_samples)
            .unwrap_or_default()
            .into_iter()
            .map_while(|sample| {
                let video = sample.video?;
                Some(VideoReference {
                    uri: video.uri?,
                    duration_seconds: video.duration_seconds,
                })
            })
            .collect();

        let failure = op.error.map(|e| match (e.code, e.message) {
            (Some(code), Some(message)) => format!("{} (code {})", message, code),
            (None, Some(message)) => message,
            (Some(code), None) => format!("operation failed with code {}", code),
            (None, None) => "operation failed".to_string(),
        });

        GenerationOperation::Done {
            name: op.name,
            videos,
            failure,
        }
    }
}

impl VeoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client for Veo")?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            playback_url_policy: config.playback_url_policy,
        })
    }

    /// Submit a `predictLongRunning` request
    async fn predict(&self, request: &PredictRequest<'_>) -> Result<GenerationOperation> {
        let url = format!("{}/models/{}:predictLongRunning", self.api_base, self.model);

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .await
            .context("Failed to send request to Veo API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Veo API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let operation: OperationResponse = response
            .json()
            .await
            .context("Failed to parse Veo API response")?;

        tracing::info!(operation = %operation.name, model = %self.model, "Veo operation started");

        Ok(operation.into())
    }

    /// Fetch the current state of an operation by name
    async fn get_operation(&self, name: &str) -> Result<GenerationOperation> {
        let url = format!("{}/{}", self.api_base, name);

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .context("Failed to get operation status from Veo API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Failed to get operation status: {} - {}",
                status,
                error_text
            ));
        }

        let operation: OperationResponse = response
            .json()
            .await
            .context("Failed to parse operation response")?;

        Ok(operation.into())
    }
}

#[async_trait]
impl GenerationClient for VeoClient {
    async fn start_generation(
        &self,
        prompt: &str,
        reference_images: &[ReferenceImage],
        settings: &VideoSettings,
    ) -> Result<GenerationOperation> {
        if reference_images.len() > MAX_REFERENCE_IMAGES {
            anyhow::bail!(
                "Veo accepts at most {} reference images, got {}",
                MAX_REFERENCE_IMAGES,
                reference_images.len()
            );
        }

        let request = PredictRequest {
            instances: vec![Instance {
                prompt,
                reference_images: reference_images
                    .iter()
                    .map(|img| WireReferenceImage {
                        image: WireImage {
                            bytes_base64_encoded: &img.base64_payload,
                            mime_type: &img.mime_type,
                        },
                        reference_type: REFERENCE_TYPE_ASSET,
                    })
                    .collect(),
                video: None,
            }],
            parameters: Parameters {
                aspect_ratio: &settings.aspect_ratio,
                resolution: &settings.resolution,
                sample_count: settings.number_of_videos,
            },
        };

        tracing::debug!(
            reference_images = reference_images.len(),
            resolution = %settings.resolution,
            aspect_ratio = %settings.aspect_ratio,
            "Requesting initial video generation"
        );

        self.predict(&request)
            .await
            .context("Failed to start video generation")
    }

    async fn start_extension(
        &self,
        prompt: &str,
        previous_video: &VideoReference,
        settings: &VideoSettings,
    ) -> Result<GenerationOperation> {
        let request = PredictRequest {
            instances: vec![Instance {
                prompt,
                reference_images: Vec::new(),
                video: Some(WireVideoInput {
                    uri: &previous_video.uri,
                }),
            }],
            parameters: Parameters {
                aspect_ratio: &settings.aspect_ratio,
                resolution: &settings.resolution,
                sample_count: settings.number_of_videos,
            },
        };

        self.predict(&request)
            .await
            .context("Failed to start video extension")
    }

    async fn poll_operation(&self, operation: &GenerationOperation) -> Result<GenerationOperation> {
        match operation {
            GenerationOperation::Done { .. } => Ok(operation.clone()),
            GenerationOperation::Pending { name } => self
                .get_operation(name)
                .await
                .with_context(|| format!("Failed to poll operation {}", name)),
        }
    }

    fn playback_url(&self, video: &VideoReference) -> Result<String> {
        playback_url(&video.uri, &self.api_key, self.playback_url_policy)
    }
}
