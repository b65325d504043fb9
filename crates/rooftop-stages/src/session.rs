//! Render session: the state behind the viewer and the timeline.
//!
//! A [`Session`] owns the uploaded base image, the [`Gallery`] of stage
//! renders, the active stage and the transient view flags. It never
//! performs I/O itself. Asking for a stage either switches to a cached
//! render or hands out a [`Ticket`]; the caller runs the ticket through
//! an image model and reports back with [`Session::complete`].
//!
//! ```text
//!            request(S), S cached
//!          ┌───────────────────────┐
//!          ▼                       │
//!        Idle ──request(S)──▶ Loading(S) ──complete(Err)──▶ Error
//!          ▲                       │                          │
//!          └────complete(Ok)───────┘◀──────request(S')────────┘
//! ```
//!
//! # Stale completions
//!
//! Every ticket records the session epoch at the time it was issued.
//! Uploading, clearing the base image, and clearing stages bump the epoch
//! and forget the tracked ticket, so a render that resolves afterwards is
//! reported as [`Completion::Stale`] and dropped instead of landing in a
//! gallery that belongs to a different image.

use std::fmt;

use crate::gallery::{Gallery, GeneratedImage};
use crate::payload::ImagePayload;
use crate::stage::{ORIGINAL_TITLE, Stage};

/// Message shown to the user when a render fails, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str = "Erro ao transformar imagem. Verifique se o prompt \
                                             não viola políticas de segurança ou tente novamente.";

/// Coarse controller state, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight and no error showing.
    Idle,
    /// A render for the given stage is in flight.
    Loading(Stage),
    /// The last render failed and the message has not been dismissed.
    Error,
}

/// Work order for one stage render.
///
/// Carries everything the image model needs so the caller does not have
/// to hold a borrow of the session across the call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a started render must be completed with Session::complete"]
pub struct Ticket {
    stage: Stage,
    prompt: &'static str,
    base: ImagePayload,
    epoch: u64,
}

impl Ticket {
    /// Stage being rendered.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Prompt to send with the base image.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        self.prompt
    }

    /// Base image the render is derived from.
    #[must_use]
    pub const fn base_image(&self) -> &ImagePayload {
        &self.base
    }
}

/// Result of [`Session::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// The stage was already rendered; it is now active and no model call
    /// is needed.
    Cached(Stage),
    /// A render must be produced for the ticket.
    Started(Ticket),
}

/// Reasons [`Session::request`] refuses to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// No base image has been uploaded.
    #[error("no base image uploaded")]
    NoBaseImage,

    /// The stage has no prompt (only [`Stage::Original`]).
    #[error("stage {0} cannot be generated")]
    NotGeneratable(Stage),

    /// Another render is already in flight.
    #[error("a render for stage {0} is already in progress")]
    Busy(Stage),
}

/// Result of [`Session::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The render was cached and made active.
    Applied(Stage),
    /// The render failed; the session is in [`Phase::Error`].
    Failed(Stage),
    /// The ticket no longer matches the session and was ignored.
    Stale,
}

/// Timeline flags for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    /// The stage is the one being displayed.
    pub is_active: bool,
    /// A render for the stage is cached.
    pub is_generated: bool,
    /// The stage can be clicked (base image present, nothing in flight).
    pub is_enabled: bool,
}

/// The currently displayed image, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested filename, `rooftop-{stage}-{timestamp}.png`.
    pub filename: String,
    /// Image to save.
    pub image: ImagePayload,
}

/// Render session state.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Session {
    base: Option<ImagePayload>,
    active: Stage,
    gallery: Gallery,
    pending: Option<(Stage, u64)>,
    error: Option<String>,
    show_original: bool,
    epoch: u64,
}

impl Session {
    /// Create an empty session with no base image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to display `stage`.
    ///
    /// Switches straight to a cached render when one exists. Otherwise
    /// clears any error, enters [`Phase::Loading`] and returns the ticket
    /// to render.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoBaseImage`] before the first upload,
    /// [`RequestError::NotGeneratable`] for [`Stage::Original`], and
    /// [`RequestError::Busy`] while another render is in flight.
    pub fn request(&mut self, stage: Stage) -> Result<Request, RequestError> {
        let base = self.base.as_ref().ok_or(RequestError::NoBaseImage)?;
        let config = stage.config().ok_or(RequestError::NotGeneratable(stage))?;
        if let Some((in_flight, _)) = self.pending {
            return Err(RequestError::Busy(in_flight));
        }

        if self.gallery.contains(stage) {
            tracing::debug!(%stage, "stage already rendered, switching");
            self.active = stage;
            return Ok(Request::Cached(stage));
        }

        tracing::info!(%stage, epoch = self.epoch, "starting stage render");
        self.error = None;
        self.pending = Some((stage, self.epoch));
        Ok(Request::Started(Ticket {
            stage,
            prompt: config.prompt,
            base: base.clone(),
            epoch: self.epoch,
        }))
    }

    /// Report the outcome of a ticket.
    ///
    /// On success the render is cached and made active. On failure the
    /// fixed [`GENERATION_FAILED_MESSAGE`] is shown and the gallery and
    /// active stage are left alone. Either way the loading flag clears.
    /// Tickets issued before the last reset are ignored.
    pub fn complete<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<ImagePayload, E>,
        timestamp: u64,
    ) -> Completion {
        if self.pending != Some((ticket.stage, ticket.epoch)) {
            tracing::debug!(
                stage = %ticket.stage,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding stale render"
            );
            return Completion::Stale;
        }
        self.pending = None;

        match outcome {
            Ok(url) => {
                let stage = ticket.stage;
                let image = GeneratedImage {
                    stage,
                    url,
                    timestamp,
                };
                if self.gallery.insert(image).is_err() {
                    // `request` never issues a ticket for a cached stage.
                    tracing::warn!(%stage, "render arrived for an already cached stage");
                }
                self.active = stage;
                tracing::info!(%stage, "stage render finished");
                Completion::Applied(stage)
            }
            Err(e) => {
                tracing::error!(stage = %ticket.stage, error = %e, "stage render failed");
                self.error = Some(GENERATION_FAILED_MESSAGE.to_owned());
                Completion::Failed(ticket.stage)
            }
        }
    }

    /// Replace the base image.
    ///
    /// Allowed in any phase. Resets the active stage to
    /// [`Stage::Original`], empties the gallery, clears the error and
    /// orphans any in-flight ticket.
    pub fn upload(&mut self, image: ImagePayload) {
        tracing::info!(mime = image.mime_type(), "base image uploaded");
        self.base = Some(image);
        self.reset();
    }

    /// Drop the base image, returning to the empty state.
    pub fn clear_base(&mut self) {
        self.base = None;
        self.reset();
    }

    /// Forget every render but keep the base image.
    pub fn clear_stages(&mut self) {
        self.active = Stage::Original;
        self.gallery.clear();
        self.forget_pending();
    }

    /// Hide the error message.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Set the hold-to-compare override.
    pub const fn set_show_original(&mut self, show: bool) {
        self.show_original = show;
    }

    /// Image to display right now.
    ///
    /// The base image while comparing or when [`Stage::Original`] is
    /// active; otherwise the active stage's render, falling back to the
    /// base image if it is missing. `None` only before an upload.
    #[must_use]
    pub fn display(&self) -> Option<&ImagePayload> {
        if self.show_original || self.active == Stage::Original {
            return self.base.as_ref();
        }
        self.gallery
            .get(self.active)
            .map(|image| &image.url)
            .or(self.base.as_ref())
    }

    /// The displayed image with a filename derived from the active stage
    /// and `timestamp` (milliseconds since the Unix epoch).
    #[must_use]
    pub fn download(&self, timestamp: u64) -> Option<Download> {
        let image = self.display()?.clone();
        Some(Download {
            filename: format!("rooftop-{}-{timestamp}.png", self.active.slug()),
            image,
        })
    }

    /// Timeline flags for `stage`.
    #[must_use]
    pub fn stage_status(&self, stage: Stage) -> StageStatus {
        StageStatus {
            is_active: self.active == stage,
            is_generated: self.gallery.contains(stage),
            is_enabled: self.timeline_enabled(),
        }
    }

    /// Whether stages can be requested from the timeline.
    #[must_use]
    pub const fn timeline_enabled(&self) -> bool {
        self.base.is_some() && self.pending.is_none()
    }

    /// Number of stages with a cached render.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.gallery.len()
    }

    /// Badge text for the active stage.
    #[must_use]
    pub fn active_title(&self) -> &'static str {
        self.active
            .config()
            .map_or(ORIGINAL_TITLE, |config| config.title)
    }

    /// Current controller phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.pending {
            Some((stage, _)) => Phase::Loading(stage),
            None if self.error.is_some() => Phase::Error,
            None => Phase::Idle,
        }
    }

    /// Whether a render is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The uploaded base image.
    #[must_use]
    pub const fn base_image(&self) -> Option<&ImagePayload> {
        self.base.as_ref()
    }

    /// Stage currently selected for display.
    #[must_use]
    pub const fn active_stage(&self) -> Stage {
        self.active
    }

    /// Cached renders for the current base image.
    #[must_use]
    pub const fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Error message awaiting dismissal.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the hold-to-compare override is on.
    #[must_use]
    pub const fn show_original(&self) -> bool {
        self.show_original
    }

    fn reset(&mut self) {
        self.active = Stage::Original;
        self.gallery.clear();
        self.error = None;
        self.forget_pending();
    }

    fn forget_pending(&mut self) {
        if let Some((stage, _)) = self.pending.take() {
            tracing::debug!(%stage, "orphaning in-flight render");
        }
        self.epoch += 1;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("has_base", &self.base.is_some())
            .field("active", &self.active)
            .field("generated", &self.gallery.len())
            .field("phase", &self.phase())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn image(byte: u8) -> ImagePayload {
        ImagePayload::from_bytes("image/png", &[byte; 8]).unwrap()
    }

    fn start(session: &mut Session, stage: Stage) -> Ticket {
        match session.request(stage).unwrap() {
            Request::Started(ticket) => ticket,
            Request::Cached(s) => panic!("expected a ticket for {s}, got a cache hit"),
        }
    }

    fn session_with_base() -> Session {
        let mut session = Session::new();
        session.upload(image(1));
        session
    }

    #[test]
    fn empty_session_displays_nothing() {
        let session = Session::new();
        assert_eq!(session.display(), None);
        assert_eq!(session.download(5), None);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.timeline_enabled());
    }

    #[test]
    fn request_requires_base_image() {
        let mut session = Session::new();
        assert_eq!(
            session.request(Stage::Foundation),
            Err(RequestError::NoBaseImage)
        );
    }

    #[test]
    fn original_is_not_generatable() {
        let mut session = session_with_base();
        assert_eq!(
            session.request(Stage::Original),
            Err(RequestError::NotGeneratable(Stage::Original))
        );
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn ticket_carries_base_and_prompt() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Masonry);
        assert_eq!(ticket.stage(), Stage::Masonry);
        assert_eq!(ticket.base_image(), &image(1));
        assert_eq!(
            Some(ticket.prompt()),
            Stage::Masonry.config().map(|c| c.prompt)
        );
        assert_eq!(session.phase(), Phase::Loading(Stage::Masonry));
        assert!(!session.timeline_enabled());
    }

    #[test]
    fn second_request_while_loading_is_busy() {
        let mut session = session_with_base();
        let _ticket = start(&mut session, Stage::Foundation);
        assert_eq!(
            session.request(Stage::Masonry),
            Err(RequestError::Busy(Stage::Foundation))
        );
    }

    #[test]
    fn success_caches_and_activates() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);
        let outcome = session.complete(ticket, Ok::<_, String>(image(2)), 42);

        assert_eq!(outcome, Completion::Applied(Stage::Foundation));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.active_stage(), Stage::Foundation);
        assert_eq!(session.display(), Some(&image(2)));
        let cached = session.gallery().get(Stage::Foundation).unwrap();
        assert_eq!(cached.timestamp, 42);
    }

    #[test]
    fn cached_stage_is_not_requested_again() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);
        let ticket = start(&mut session, Stage::Masonry);
        session.complete(ticket, Ok::<_, String>(image(3)), 2);

        assert_eq!(
            session.request(Stage::Foundation),
            Ok(Request::Cached(Stage::Foundation))
        );
        assert_eq!(session.active_stage(), Stage::Foundation);
        assert_eq!(session.display(), Some(&image(2)));
        assert_eq!(session.gallery().len(), 2);
    }

    #[test]
    fn failure_sets_error_and_keeps_state() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);

        let ticket = start(&mut session, Stage::Completed);
        let outcome = session.complete(ticket, Err::<ImagePayload, _>("no image returned"), 2);

        assert_eq!(outcome, Completion::Failed(Stage::Completed));
        assert_eq!(session.phase(), Phase::Error);
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert_eq!(session.active_stage(), Stage::Foundation);
        assert_eq!(session.gallery().len(), 1);
        assert!(session.timeline_enabled());
    }

    #[test]
    fn error_clears_on_dismiss_or_new_request() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);
        session.complete(ticket, Err::<ImagePayload, _>("boom"), 1);
        session.dismiss_error();
        assert_eq!(session.phase(), Phase::Idle);

        let ticket = start(&mut session, Stage::Foundation);
        session.complete(ticket, Err::<ImagePayload, _>("boom"), 2);
        let _retry = start(&mut session, Stage::Foundation);
        assert_eq!(session.error(), None);
        assert_eq!(session.phase(), Phase::Loading(Stage::Foundation));
    }

    #[test]
    fn upload_resets_everything() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Finishing);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);
        let ticket = start(&mut session, Stage::Masonry);
        session.complete(ticket, Err::<ImagePayload, _>("boom"), 2);

        session.upload(image(9));
        assert_eq!(session.active_stage(), Stage::Original);
        assert!(session.gallery().is_empty());
        assert_eq!(session.error(), None);
        assert_eq!(session.display(), Some(&image(9)));
    }

    #[test]
    fn upload_while_loading_discards_the_late_render() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);

        session.upload(image(7));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.timeline_enabled());

        let outcome = session.complete(ticket, Ok::<_, String>(image(2)), 1);
        assert_eq!(outcome, Completion::Stale);
        assert!(session.gallery().is_empty());
        assert_eq!(session.active_stage(), Stage::Original);
        assert_eq!(session.display(), Some(&image(7)));
    }

    #[test]
    fn stale_ticket_does_not_clobber_newer_request() {
        let mut session = session_with_base();
        let old = start(&mut session, Stage::Foundation);
        session.clear_stages();
        let new = start(&mut session, Stage::Foundation);

        assert_eq!(
            session.complete(old, Err::<ImagePayload, _>("late failure"), 1),
            Completion::Stale
        );
        assert_eq!(session.phase(), Phase::Loading(Stage::Foundation));
        assert_eq!(
            session.complete(new, Ok::<_, String>(image(3)), 2),
            Completion::Applied(Stage::Foundation)
        );
    }

    #[test]
    fn clear_stages_keeps_base() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Masonry);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);

        session.clear_stages();
        assert_eq!(session.active_stage(), Stage::Original);
        assert!(session.gallery().is_empty());
        assert_eq!(session.base_image(), Some(&image(1)));
        assert_eq!(session.display(), Some(&image(1)));
    }

    #[test]
    fn clear_base_returns_to_empty() {
        let mut session = session_with_base();
        session.clear_base();
        assert_eq!(session.base_image(), None);
        assert_eq!(session.display(), None);
        assert_eq!(session.active_stage(), Stage::Original);
    }

    #[test]
    fn show_original_overrides_active_render() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Completed);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);

        session.set_show_original(true);
        assert_eq!(session.display(), Some(&image(1)));
        session.set_show_original(false);
        assert_eq!(session.display(), Some(&image(2)));
    }

    #[test]
    fn download_names_file_after_active_stage() {
        let mut session = session_with_base();
        let original = session.download(1_700_000_000_000).unwrap();
        assert_eq!(original.filename, "rooftop-original-1700000000000.png");
        assert_eq!(original.image, image(1));

        let ticket = start(&mut session, Stage::Finishing);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);
        let render = session.download(99).unwrap();
        assert_eq!(render.filename, "rooftop-finishing-99.png");
        assert_eq!(render.image, image(2));
    }

    #[test]
    fn stage_status_reflects_session() {
        let mut session = session_with_base();
        let ticket = start(&mut session, Stage::Foundation);
        assert!(!session.stage_status(Stage::Masonry).is_enabled);

        session.complete(ticket, Ok::<_, String>(image(2)), 1);
        let foundation = session.stage_status(Stage::Foundation);
        assert!(foundation.is_active && foundation.is_generated && foundation.is_enabled);
        let masonry = session.stage_status(Stage::Masonry);
        assert!(!masonry.is_active && !masonry.is_generated && masonry.is_enabled);
        assert_eq!(session.generated_count(), 1);

        session.clear_stages();
        assert_eq!(session.generated_count(), 0);
    }

    #[test]
    fn active_title_tracks_stage() {
        let mut session = session_with_base();
        assert_eq!(session.active_title(), ORIGINAL_TITLE);
        let ticket = start(&mut session, Stage::Completed);
        session.complete(ticket, Ok::<_, String>(image(2)), 1);
        assert_eq!(session.active_title(), "Etapa 4: Obra Concluída");
    }
}
