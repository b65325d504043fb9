//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Image model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Base URL of the generative language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for [`GeminiClient`](crate::GeminiClient).
///
/// Built explicitly by each front-end; the client never reads the
/// process environment. An empty `api_key` is accepted and the remote
/// call reports the failure.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-flash-image`).
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, without a trailing slash.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl GeneratorConfig {
    /// Config with the default model and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            endpoint: default_endpoint(),
        }
    }

    /// Replace the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the API base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Full URL of the `generateContent` method for the configured model.
    #[must_use]
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}
