//! Turning uploaded files into image payloads.

use rooftop_stages::payload::mime_for_filename;
use rooftop_stages::{ImagePayload, PayloadError};

/// `accept` attribute for the file picker.
pub const ACCEPT: &str = "image/*";

/// Errors that can occur while accepting an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file is not an image, or its type could not be determined.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The file contents could not be encoded.
    #[error("Invalid image file: {0}")]
    Payload(#[from] PayloadError),
}

/// Encode uploaded file bytes as a payload.
///
/// The MIME type reported by the browser wins. When the browser reports
/// none, the type is guessed from the filename extension.
///
/// # Errors
///
/// Returns [`UploadError::UnsupportedType`] when the type is not
/// `image/*` or cannot be determined, and [`UploadError::Payload`] for
/// empty files.
pub fn payload_from_upload(
    name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ImagePayload, UploadError> {
    let mime_type = content_type
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .or_else(|| mime_for_filename(name))
        .ok_or_else(|| UploadError::UnsupportedType(name.to_owned()))?;
    ImagePayload::from_bytes(mime_type, bytes).map_err(|e| match e {
        PayloadError::NotAnImage(mime) => UploadError::UnsupportedType(mime),
        other => UploadError::Payload(other),
    })
}
