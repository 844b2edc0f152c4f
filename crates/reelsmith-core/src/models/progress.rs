use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Where a generation run currently is.
///
/// `Idle -> GeneratingInitial -> Extending* -> Complete`, with `Error`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    GeneratingInitial,
    Extending,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Complete | GenerationStatus::Error)
    }
}

impl Display for GenerationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GenerationStatus::Idle => write!(f, "idle"),
            GenerationStatus::GeneratingInitial => write!(f, "generating_initial"),
            GenerationStatus::Extending => write!(f, "extending"),
            GenerationStatus::Complete => write!(f, "complete"),
            GenerationStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot handed to progress sinks at every state transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationProgress {
    pub status: GenerationStatus,
    pub message: String,
    pub current_segment: u32,
    pub total_segments: u32,
}

impl GenerationProgress {
    pub fn idle(message: impl Into<String>) -> Self {
        Self {
            status: GenerationStatus::Idle,
            message: message.into(),
            current_segment: 0,
            total_segments: 0,
        }
    }
}

impl Default for GenerationProgress {
    fn default() -> Self {
        Self::idle("Ready to generate video")
    }
}
