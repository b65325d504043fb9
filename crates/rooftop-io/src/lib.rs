//! rooftop-io: Browser I/O and Dioxus component library.
//!
//! Handles image uploads, Blob downloads, and provides the viewer,
//! timeline and upload components for the rooftop web application.

pub mod components;
pub mod download;
pub mod upload;

pub use components::{FileUpload, Timeline, Viewer};
pub use download::{DownloadError, save};
pub use upload::{UploadError, payload_from_upload};
