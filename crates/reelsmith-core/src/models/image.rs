use bytes::Bytes;
use serde::Serialize;

/// An image picked by the user, kept alongside its inline base64 form.
///
/// Built by [`crate::ImageCodec`]; never mutated afterwards. An empty
/// `base64_payload` means the source could not be read and the image is
/// unavailable for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    /// Display name of the source (usually the file name)
    pub name: String,
    /// Raw bytes the payload was encoded from
    #[serde(skip)]
    pub bytes: Bytes,
    /// Standard base64, no `data:` prefix
    pub base64_payload: String,
    /// MIME type as declared by the source
    pub mime_type: String,
}

impl UploadedImage {
    /// Whether the image carries a usable payload
    pub fn is_available(&self) -> bool {
        !self.base64_payload.is_empty()
    }

    /// Inline form sent to the generation service
    pub fn to_reference(&self) -> ReferenceImage {
        ReferenceImage {
            base64_payload: self.base64_payload.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Image embedded directly in a generation request to ground the output visually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceImage {
    pub base64_payload: String,
    pub mime_type: String,
}
