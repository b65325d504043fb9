//! The image model seam and its HTTP implementation.

use async_trait::async_trait;
use rooftop_stages::{ImagePayload, Ticket};

use crate::GenerateError;
use crate::config::GeneratorConfig;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Something that can redraw a base image according to a prompt.
///
/// Implementations make exactly one model call per invocation and do no
/// caching; the session decides when a call is needed.
///
/// Futures are not required to be `Send`: in the browser the whole app
/// runs on one thread and `fetch` futures are `!Send`.
#[async_trait(?Send)]
pub trait ImageTransformer {
    /// Produce a new image from `base` following `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::EmptyPrompt`] for a blank prompt,
    /// [`GenerateError::NoImage`] when the model answers without an image,
    /// and transport/API errors unchanged.
    async fn transform_image(
        &self,
        base: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerateError>;

    /// Run a session ticket.
    ///
    /// # Errors
    ///
    /// Same as [`transform_image`](Self::transform_image).
    async fn render(&self, ticket: &Ticket) -> Result<ImagePayload, GenerateError> {
        self.transform_image(ticket.base_image(), ticket.prompt())
            .await
    }
}

/// [`ImageTransformer`] backed by the Gemini `generateContent` API.
///
/// Create one per process and share it; the underlying `reqwest::Client`
/// pools connections on native targets and uses `fetch` on WASM.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeneratorConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Transport`] if the HTTP client cannot be
    /// built (e.g. the TLS backend fails to initialize).
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { config, http })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl ImageTransformer for GeminiClient {
    async fn transform_image(
        &self,
        base: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerateError> {
        if prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        let request = GenerateContentRequest::image_edit(base, prompt);
        tracing::debug!(
            model = %self.config.model,
            mime = base.mime_type(),
            base64_len = base.base64_data().len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.config.generate_content_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_image()
    }
}
