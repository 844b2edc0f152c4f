use std::time::Duration;

use reelsmith_client::MAX_REFERENCE_IMAGES;
use reelsmith_core::{Config, VideoSettings};

const TARGET_DURATION_SECS: f64 = 60.0;
const EXTENSION_ESTIMATE_SECS: f64 = 7.0;
const POLL_INTERVAL_SECS: u64 = 10;

/// Upper bound on segments per run whatever the durations say
pub const MAX_SEGMENTS_CAP: u32 = 1000;

/// How long-running operations are waited on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause before every status refresh
    pub interval: Duration,
    /// Status refreshes allowed per operation; `None` waits forever
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_attempts: None,
        }
    }
}

/// Knobs of the generation + extension loop.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub target_duration_secs: f64,
    /// Added to the running total when an extension reports no duration
    pub extension_estimate_secs: f64,
    pub max_reference_images: usize,
    /// Fixed for the whole run; extensions must match the first segment
    pub video_settings: VideoSettings,
    pub poll: PollPolicy,
}

impl AssemblyConfig {
    /// Segment budget: enough estimated extensions to cover the target.
    /// Always at least one and never above [`MAX_SEGMENTS_CAP`].
    pub fn max_segments(&self) -> u32 {
        let segments = (self.target_duration_secs / self.extension_estimate_secs).ceil();
        if segments.is_nan() || segments < 1.0 {
            return 1;
        }
        segments.min(MAX_SEGMENTS_CAP as f64) as u32
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            target_duration_secs: TARGET_DURATION_SECS,
            extension_estimate_secs: EXTENSION_ESTIMATE_SECS,
            max_reference_images: MAX_REFERENCE_IMAGES,
            video_settings: VideoSettings::default(),
            poll: PollPolicy::default(),
        }
    }
}

impl From<&Config> for AssemblyConfig {
    fn from(config: &Config) -> Self {
        Self {
            target_duration_secs: config.target_duration_secs,
            extension_estimate_secs: config.extension_estimate_secs,
            poll: PollPolicy {
                interval: config.poll_interval,
                max_attempts: config.max_poll_attempts,
            },
            ..Self::default()
        }
    }
}
