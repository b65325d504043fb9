//! Self-describing image payloads.
//!
//! Images travel through the app as base64 `data:` URIs: that is what a
//! browser `FileReader` produces, what an `<img src>` accepts, and what
//! the image model's inline data maps onto once the prefix is stripped.
//! [`ImagePayload`] keeps the MIME type and the base64 body apart so each
//! consumer can take the half it needs.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type assumed for model output that does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Common image file extensions with their MIME types. Only consulted when
/// the source does not report a MIME type of its own.
const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jfif", "image/jpeg"),
    ("avif", "image/avif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// Errors produced while building an [`ImagePayload`].
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The input does not start with `data:`.
    #[error("not a data URI")]
    MissingPrefix,

    /// The data URI is not base64-encoded (no `;base64,` marker).
    #[error("data URI is not base64-encoded")]
    NotBase64,

    /// The declared MIME type is not an image type.
    #[error("unsupported media type: {0}")]
    NotAnImage(String),

    /// The payload body is empty.
    #[error("image payload is empty")]
    Empty,

    /// The payload body is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// An encoded image: MIME type plus base64 body.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Parse a `data:<mime>;base64,<body>` URI.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingPrefix`] or [`PayloadError::NotBase64`]
    /// for malformed URIs, [`PayloadError::NotAnImage`] for non-image
    /// media types, and the errors of [`from_base64`](Self::from_base64)
    /// for the body.
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or(PayloadError::MissingPrefix)?;
        let (header, body) = rest.split_once(',').ok_or(PayloadError::NotBase64)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(PayloadError::NotBase64)?;
        Self::from_base64(mime_type, body)
    }

    /// Build a payload from an already-encoded base64 body.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotAnImage`] if `mime_type` is not
    /// `image/*`, [`PayloadError::Empty`] for an empty body, and
    /// [`PayloadError::InvalidBase64`] if the body does not decode.
    pub fn from_base64(mime_type: &str, data: &str) -> Result<Self, PayloadError> {
        let mime_type = normalized_mime(mime_type)?;
        if data.is_empty() {
            return Err(PayloadError::Empty);
        }
        STANDARD.decode(data)?;
        Ok(Self {
            mime_type,
            data: data.to_owned(),
        })
    }

    /// Encode raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotAnImage`] if `mime_type` is not
    /// `image/*` and [`PayloadError::Empty`] if `bytes` is empty.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, PayloadError> {
        let mime_type = normalized_mime(mime_type)?;
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(Self {
            mime_type,
            data: STANDARD.encode(bytes),
        })
    }

    /// The MIME type, lowercased (e.g. `image/png`).
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 body without the `data:` prefix.
    #[must_use]
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Render as a `data:` URI suitable for an `<img src>`.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the body back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::InvalidBase64`] if decoding fails, which
    /// cannot happen for payloads built through this type's constructors.
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        Ok(STANDARD.decode(&self.data)?)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bodies run to megabytes; print the length only.
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("base64_len", &self.data.len())
            .finish()
    }
}

/// Look up the MIME type for an image file extension (without the dot).
#[must_use]
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|&(_, mime)| mime)
}

/// Look up the MIME type for a filename by its extension.
#[must_use]
pub fn mime_for_filename(name: &str) -> Option<&'static str> {
    name.rsplit_once('.')
        .and_then(|(_, ext)| mime_for_extension(ext))
}

fn normalized_mime(mime_type: &str) -> Result<String, PayloadError> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if mime_type.len() > "image/".len() && mime_type.starts_with("image/") {
        Ok(mime_type)
    } else {
        Err(PayloadError::NotAnImage(mime_type))
    }
}
