//! Image codec: turns picked files into inline base64 payloads.
//!
//! Reads are permissive. An input that cannot be read produces an image with an
//! empty payload instead of an error; callers check [`UploadedImage::is_available`]
//! and decide whether to drop it.

use base64::Engine;
use bytes::Bytes;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::models::UploadedImage;

/// Fallback when neither the extension nor the content identifies the image
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

pub struct ImageCodec;

impl ImageCodec {
    /// Encode bytes that are already in memory. `mime_type` is copied verbatim.
    pub fn encode(name: impl Into<String>, bytes: Bytes, mime_type: impl Into<String>) -> UploadedImage {
        let base64_payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        UploadedImage {
            name: name.into(),
            bytes,
            base64_payload,
            mime_type: mime_type.into(),
        }
    }

    /// Drain `reader` and encode its contents. A failed read yields an empty payload.
    pub async fn encode_reader<R>(
        name: impl Into<String>,
        mut reader: R,
        mime_type: impl Into<String>,
    ) -> UploadedImage
    where
        R: AsyncRead + Unpin,
    {
        let name = name.into();
        let mut buf = Vec::new();
        match reader.read_to_end(&mut buf).await {
            Ok(_) => Self::encode(name, Bytes::from(buf), mime_type),
            Err(e) => {
                tracing::warn!(image = %name, error = %e, "Failed to read image, leaving payload empty");
                Self::unavailable(name, mime_type)
            }
        }
    }

    /// Read and encode a file. The MIME type comes from the file extension,
    /// falling back to sniffing the content.
    pub async fn encode_file(path: &Path) -> UploadedImage {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared = mime_type_for_path(path);

        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to open image, leaving payload empty");
                return Self::unavailable(name, declared.unwrap_or(UNKNOWN_MIME_TYPE));
            }
        };

        let image = Self::encode_reader(name, file, declared.unwrap_or(UNKNOWN_MIME_TYPE)).await;
        if declared.is_none() && image.is_available() {
            let sniffed = detect_media_type(&image.bytes).unwrap_or(UNKNOWN_MIME_TYPE);
            tracing::debug!(image = %image.name, mime_type = sniffed, "MIME type detected from content");
            return UploadedImage {
                mime_type: sniffed.to_string(),
                ..image
            };
        }
        image
    }

    fn unavailable(name: String, mime_type: impl Into<String>) -> UploadedImage {
        UploadedImage {
            name,
            bytes: Bytes::new(),
            base64_payload: String::new(),
            mime_type: mime_type.into(),
        }
    }
}

/// MIME type declared by a file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Detect media type from image data using magic numbers
fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    if data[..3] == [0xFF, 0xD8, 0xFF] {
        return Some("image/jpeg");
    }

    if data[..4] == [0x89, 0x50, 0x4E, 0x47] {
        return Some("image/png");
    }

    if data[..3] == [0x47, 0x49, 0x46] {
        return Some("image/gif");
    }

    // RIFF....WEBP
    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    None
}
