//! Dioxus UI components for rooftop.
//!
//! Provides the file upload zone, the image viewer with its overlays and
//! controls, and the construction timeline.

mod timeline;
mod upload;
mod viewer;

pub use timeline::Timeline;
pub use upload::FileUpload;
pub use viewer::{LOADING_MESSAGES, Viewer};
