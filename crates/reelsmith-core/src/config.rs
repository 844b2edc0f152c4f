//! Configuration module
//!
//! Settings for the generation service client and the assembly loop, loaded
//! from the environment (and a `.env` file when present).

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::selection::DEFAULT_MAX_IMAGES;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "veo-3.1-generate-preview";
const TARGET_DURATION_SECS: f64 = 60.0;
const EXTENSION_ESTIMATE_SECS: f64 = 7.0;
const POLL_INTERVAL_SECS: u64 = 10;
const HTTP_TIMEOUT_SECS: u64 = 120;

/// How the final video URI is turned into something a player can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackUrlPolicy {
    /// Hand out the service URI untouched; the player must authenticate itself
    Raw,
    /// Append the API key as a `key` query parameter
    #[default]
    EmbedCredential,
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub target_duration_secs: f64,
    pub extension_estimate_secs: f64,
    pub poll_interval: Duration,
    /// `None` polls until the service reports completion
    pub max_poll_attempts: Option<u32>,
    pub max_images: usize,
    pub playback_url_policy: PlaybackUrlPolicy,
    pub http_timeout: Duration,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("api_key", &"[redacted]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("target_duration_secs", &self.target_duration_secs)
            .field("extension_estimate_secs", &self.extension_estimate_secs)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("max_images", &self.max_images)
            .field("playback_url_policy", &self.playback_url_policy)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config with every tunable at its default.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            target_duration_secs: TARGET_DURATION_SECS,
            extension_estimate_secs: EXTENSION_ESTIMATE_SECS,
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_poll_attempts: None,
            max_images: DEFAULT_MAX_IMAGES,
            playback_url_policy: PlaybackUrlPolicy::default(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }

    /// Load every tunable from the environment without requiring a credential.
    /// The returned config has an empty `api_key` and cannot drive a client.
    pub fn settings_from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::settings_from_lookup(|key| env::var(key).ok());
        config.validate_settings()?;
        Ok(config)
    }

    fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY (or API_KEY) must be set"))?;

        let mut config = Self::settings_from_lookup(get);
        config.api_key = api_key;
        Ok(config)
    }

    fn settings_from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_api_key(String::new());

        if let Some(api_base) = get("REELSMITH_API_BASE") {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("REELSMITH_MODEL") {
            config.model = model;
        }
        config.target_duration_secs = get("REELSMITH_TARGET_DURATION_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(TARGET_DURATION_SECS);
        config.extension_estimate_secs = get("REELSMITH_EXTENSION_ESTIMATE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(EXTENSION_ESTIMATE_SECS);
        config.poll_interval = Duration::from_secs(
            get("REELSMITH_POLL_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(POLL_INTERVAL_SECS),
        );
        config.max_poll_attempts = get("REELSMITH_MAX_POLL_ATTEMPTS").and_then(|s| s.parse().ok());
        config.max_images = get("REELSMITH_MAX_IMAGES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_IMAGES);
        let embed_key: bool = get("REELSMITH_EMBED_KEY_IN_URL")
            .unwrap_or_else(|| "true".to_string())
            .to_lowercase()
            .parse()
            .unwrap_or(true);
        config.playback_url_policy = if embed_key {
            PlaybackUrlPolicy::EmbedCredential
        } else {
            PlaybackUrlPolicy::Raw
        };
        config.http_timeout = Duration::from_secs(
            get("REELSMITH_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
        );

        config
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("GEMINI_API_KEY must not be empty"));
        }

        if self.api_key == "your-api-key" || self.api_key.len() < 10 {
            return Err(anyhow::anyhow!(
                "GEMINI_API_KEY appears to be invalid or a placeholder"
            ));
        }

        self.validate_settings()
    }

    /// Checks everything except the credential
    pub fn validate_settings(&self) -> Result<(), anyhow::Error> {
        if !self.target_duration_secs.is_finite() || self.target_duration_secs <= 0.0 {
            return Err(anyhow::anyhow!(
                "REELSMITH_TARGET_DURATION_SECS must be a finite number greater than zero"
            ));
        }

        if !self.extension_estimate_secs.is_finite() || self.extension_estimate_secs <= 0.0 {
            return Err(anyhow::anyhow!(
                "REELSMITH_EXTENSION_ESTIMATE_SECS must be a finite number greater than zero"
            ));
        }

        if self.max_images == 0 {
            return Err(anyhow::anyhow!("REELSMITH_MAX_IMAGES must be at least 1"));
        }

        if self.max_poll_attempts == Some(0) {
            return Err(anyhow::anyhow!(
                "REELSMITH_MAX_POLL_ATTEMPTS must be at least 1 when set"
            ));
        }

        Ok(())
    }
}
