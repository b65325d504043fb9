//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;
use rooftop_stages::ImagePayload;

use crate::upload::{ACCEPT, payload_from_upload};

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Whether a base image is already loaded (changes the button label).
    has_base: bool,
    /// Called with the encoded image after a successful upload.
    on_upload: EventHandler<ImagePayload>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts any `image/*` file. Unsupported or unreadable files are
/// reported inline and never reach the session.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut filename = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        let content_type = file.content_type();
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%name, error = %e, "failed to read upload");
                error.set(Some(format!("Failed to read file: {e}")));
                return;
            }
        };
        match payload_from_upload(&name, content_type.as_deref(), &bytes) {
            Ok(payload) => {
                filename.set(Some(name));
                error.set(None);
                props.on_upload.call(payload);
            }
            Err(e) => {
                tracing::warn!(%name, error = %e, "rejected upload");
                error.set(Some(e.to_string()));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload-zone upload-zone--dragging"
    } else {
        "upload-zone"
    };
    let label = if props.has_base {
        "Alterar Modelo"
    } else {
        "Upload do Modelo"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            label { class: "btn btn-primary",
                input {
                    r#type: "file",
                    accept: ACCEPT,
                    class: "hidden",
                    onchange: handle_files,
                }
                Icon { width: 18, height: 18, icon: LdUpload }
                "{label}"
            }

            if let Some(ref name) = filename() {
                span { class: "upload-note", "{name}" }
            }

            if let Some(ref err) = error() {
                span { class: "upload-error", "{err}" }
            }
        }
    }
}
