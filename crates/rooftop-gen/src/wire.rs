//! JSON bodies of the `generateContent` method.
//!
//! Only the fields the image-edit call uses are modeled. Unknown response
//! fields are ignored so API additions do not break decoding.

use rooftop_stages::ImagePayload;
use rooftop_stages::payload::DEFAULT_MIME_TYPE;
use serde::{Deserialize, Serialize};

use crate::GenerateError;

/// Request body: one user turn with the base image followed by the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation turns; always a single user turn here.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build the image-edit request for `base` and `prompt`.
    #[must_use]
    pub fn image_edit(base: &ImagePayload, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![
                    Part::inline(base.mime_type(), base.base64_data()),
                    Part::text(prompt),
                ],
            }],
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text or inline-data fragment of a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 binary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_owned(),
                data: data.to_owned(),
            }),
        }
    }
}

/// Base64 binary content with its MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type; may be empty in responses.
    #[serde(default)]
    pub mime_type: String,
    /// Base64 body without a `data:` prefix.
    pub data: String,
}

/// Response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Model answers; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was rejected.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One model answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Answer content; absent when generation was blocked.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (`STOP`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked, if it was.
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or an empty slice.
    #[must_use]
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map_or(&[], |content| content.parts.as_slice())
    }

    /// The first inline image of the first candidate.
    #[must_use]
    pub fn first_inline_image(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .find_map(|part| part.inline_data.as_ref())
    }

    /// Convert the first inline image into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::NoImage`] when the first candidate has no
    /// inline data, keeping any text and block reason for diagnostics.
    /// Returns [`GenerateError::InvalidImage`] when the returned data is
    /// not a decodable image payload.
    pub fn into_image(self) -> Result<ImagePayload, GenerateError> {
        if let Some(inline) = self.first_inline_image() {
            let mime_type = if inline.mime_type.is_empty() {
                DEFAULT_MIME_TYPE
            } else {
                inline.mime_type.as_str()
            };
            return Ok(ImagePayload::from_base64(mime_type, &inline.data)?);
        }

        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let reason = self
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .or_else(|| {
                self.candidates
                    .into_iter()
                    .next()
                    .and_then(|candidate| candidate.finish_reason)
            });

        Err(GenerateError::NoImage {
            text: (!text.is_empty()).then_some(text),
            reason,
        })
    }
}
