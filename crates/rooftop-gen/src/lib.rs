//! rooftop-gen: generative image model client.
//!
//! Sends a base image and a stage prompt to the image model and returns
//! the redrawn image. The [`ImageTransformer`] trait is the seam between
//! the session and the network; [`GeminiClient`] implements it over
//! HTTP. [`generate_stage`] runs one stage request end to end for callers
//! that own the [`Session`] outright (the CLI, tests).

pub mod client;
pub mod config;
pub mod wire;

pub use client::{GeminiClient, ImageTransformer};
pub use config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeneratorConfig};

use rooftop_stages::{Completion, PayloadError, Request, RequestError, Session, Stage};

/// Errors from a model call.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The prompt was blank.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The model answered without an image part, typically because a
    /// safety policy rejected the request.
    #[error("no image was returned by the model{}", .reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    NoImage {
        /// Text the model returned instead, if any.
        text: Option<String>,
        /// Block or finish reason reported by the API.
        reason: Option<String>,
    },

    /// The model returned inline data that is not a valid image payload.
    #[error("model returned an invalid image: {0}")]
    InvalidImage(#[from] PayloadError),

    /// The API answered with a non-success status.
    #[error("image API returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a JSON error object.
        body: String,
    },

    /// The request could not be sent or the response not read.
    #[error("request to image API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("failed to decode image API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request `stage` on `session`, calling `transformer` on a cache miss.
///
/// A cached stage is switched to without a model call and reported as
/// [`Completion::Applied`]. A model failure is recorded on the session
/// and reported as [`Completion::Failed`]; it is not an `Err`.
///
/// # Errors
///
/// Returns the [`RequestError`] from [`Session::request`] when the
/// session refuses the request.
pub async fn generate_stage<T>(
    session: &mut Session,
    transformer: &T,
    stage: Stage,
) -> Result<Completion, RequestError>
where
    T: ImageTransformer + ?Sized,
{
    let ticket = match session.request(stage)? {
        Request::Cached(stage) => return Ok(Completion::Applied(stage)),
        Request::Started(ticket) => ticket,
    };

    let outcome = transformer.render(&ticket).await;
    Ok(session.complete(ticket, outcome, rooftop_stages::now_millis()))
}
