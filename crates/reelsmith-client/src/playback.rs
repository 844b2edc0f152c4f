use anyhow::{Context, Result};
use reqwest::Url;

use reelsmith_core::PlaybackUrlPolicy;

/// Turn a service video URI into a playable URL according to `policy`.
///
/// With [`PlaybackUrlPolicy::EmbedCredential`] the API key ends up in the URL,
/// so the result must be handled like the key itself.
pub fn playback_url(uri: &str, api_key: &str, policy: PlaybackUrlPolicy) -> Result<String> {
    match policy {
        PlaybackUrlPolicy::Raw => Ok(uri.to_string()),
        PlaybackUrlPolicy::EmbedCredential => {
            let mut url =
                Url::parse(uri).with_context(|| format!("Invalid video URI returned by service: {}", uri))?;
            url.query_pairs_mut().append_pair("key", api_key);
            Ok(url.to_string())
        }
    }
}
