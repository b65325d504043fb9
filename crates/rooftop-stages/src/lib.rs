//! rooftop-stages: construction stage catalog and render session (sans-IO).
//!
//! Holds everything about a rooftop visualization session that does not
//! touch the network or the browser: the fixed catalog of construction
//! stages and their prompts, the encoded image payloads, the gallery of
//! generated renders and the [`Session`] state machine that decides when
//! a render has to be requested. Talking to the image model lives in
//! `rooftop-gen`; browser interaction lives in `rooftop-io`.

pub mod gallery;
pub mod payload;
pub mod session;
pub mod stage;

pub use gallery::{Gallery, GeneratedImage};
pub use payload::{ImagePayload, PayloadError};
pub use session::{
    Completion, Download, GENERATION_FAILED_MESSAGE, Phase, Request, RequestError, Session,
    StageStatus, Ticket,
};
pub use stage::{ORIGINAL_TITLE, Stage, StageConfig, StageIcon, catalog};

/// Wall-clock time in milliseconds since the Unix epoch.
///
/// Backed by `Date.now()` on WASM. Returns 0 if the clock reads earlier
/// than the epoch.
#[must_use]
pub fn now_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
