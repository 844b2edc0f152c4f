use serde::{Deserialize, Serialize};

/// A generated clip as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReference {
    pub uri: String,
    /// Not every response reports a duration
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// Output constraints shared by a generation and every extension of it.
///
/// The service rejects an extension whose settings differ from the clip it extends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSettings {
    pub resolution: String,
    pub aspect_ratio: String,
    pub number_of_videos: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            resolution: "720p".to_string(),
            aspect_ratio: "16:9".to_string(),
            number_of_videos: 1,
        }
    }
}

/// Long-running unit of work on the generation service.
///
/// `Pending` only ever moves to `Done`; a refreshed operation never goes back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationOperation {
    Pending {
        name: String,
    },
    Done {
        name: String,
        videos: Vec<VideoReference>,
        /// Failure reported by the service for a finished operation
        failure: Option<String>,
    },
}

impl GenerationOperation {
    pub fn name(&self) -> &str {
        match self {
            GenerationOperation::Pending { name } | GenerationOperation::Done { name, .. } => name,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, GenerationOperation::Done { .. })
    }

    /// First generated video of a finished operation; the rest are ignored.
    pub fn first_video(&self) -> Option<&VideoReference> {
        match self {
            GenerationOperation::Done { videos, .. } => videos.first(),
            GenerationOperation::Pending { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            GenerationOperation::Done { failure, .. } => failure.as_deref(),
            GenerationOperation::Pending { .. } => None,
        }
    }
}
