//! Full-size viewer for the displayed image.
//!
//! Shows the base image or the active stage render, the stage badge, the
//! loading overlay while a render is in flight, the error banner, and the
//! hold-to-compare and download controls.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdEye, LdX};
use gloo_timers::future::TimeoutFuture;

/// Status lines cycled under the spinner while a render is in flight.
pub const LOADING_MESSAGES: [&str; 5] = [
    "Analisando volumetria do rooftop...",
    "Simulando iluminação global ao pôr do sol...",
    "Aplicando texturas de cimento e madeira...",
    "Processando reflexos em vidros laminados...",
    "Finalizando renderização 8K...",
];

/// Milliseconds between loading message changes.
const LOADING_MESSAGE_INTERVAL_MS: u32 = 3_000;

/// Props for the [`Viewer`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ViewerProps {
    /// `data:` URI of the image to show. `None` before an upload.
    image: Option<String>,
    /// Badge text for the active stage.
    title: String,
    /// Whether a render is in flight.
    loading: bool,
    /// Error message to show, if any.
    error: Option<String>,
    /// Fired when the error banner is dismissed.
    on_dismiss_error: EventHandler<()>,
    /// Fired with `true` when the compare button is pressed and `false`
    /// when it is released or the pointer leaves it.
    on_compare: EventHandler<bool>,
    /// Fired when the download button is clicked.
    on_download: EventHandler<()>,
}

/// Image viewer with overlays.
#[component]
pub fn Viewer(props: ViewerProps) -> Element {
    let Some(ref src) = props.image else {
        return rsx! {
            div { class: "viewer viewer--empty",
                p { class: "viewer-empty-title", "Novo Projeto" }
                p { class: "viewer-empty-hint",
                    "Faça upload de uma foto, planta ou modelo 3D para iniciar a visualização."
                }
            }
        };
    };

    let on_compare = props.on_compare;
    let on_download = props.on_download;
    let on_dismiss_error = props.on_dismiss_error;
    let image_class = if props.loading {
        "viewer-image viewer-image--blurred"
    } else {
        "viewer-image"
    };

    rsx! {
        div { class: "viewer",
            img {
                src: "{src}",
                alt: "Transformation Viewer",
                class: "{image_class}",
            }

            if props.loading {
                LoadingOverlay {}
            }

            if let Some(ref err) = props.error {
                div { class: "viewer-error", role: "alert",
                    span { "{err}" }
                    button {
                        class: "viewer-error-dismiss",
                        aria_label: "Fechar",
                        onclick: move |_| on_dismiss_error.call(()),
                        Icon { width: 16, height: 16, icon: LdX }
                    }
                }
            }

            div { class: "viewer-controls",
                button {
                    class: "viewer-control",
                    onmousedown: move |_| on_compare.call(true),
                    onmouseup: move |_| on_compare.call(false),
                    onmouseleave: move |_| on_compare.call(false),
                    ontouchstart: move |_| on_compare.call(true),
                    ontouchend: move |_| on_compare.call(false),
                    Icon { width: 14, height: 14, icon: LdEye }
                    "Segure p/ ver original"
                }
                button {
                    class: "viewer-control",
                    onclick: move |_| on_download.call(()),
                    Icon { width: 14, height: 14, icon: LdDownload }
                    "Baixar Render"
                }
            }

            div { class: "viewer-badge", "{props.title}" }
        }
    }
}

/// Spinner with rotating status messages.
///
/// Mounted only while loading, so the message index starts over for each
/// render.
#[component]
fn LoadingOverlay() -> Element {
    let mut index = use_signal(|| 0usize);

    use_future(move || async move {
        loop {
            TimeoutFuture::new(LOADING_MESSAGE_INTERVAL_MS).await;
            index.set(next_message_index(index()));
        }
    });

    let message = LOADING_MESSAGES[index() % LOADING_MESSAGES.len()];

    rsx! {
        div { class: "viewer-loading",
            div { class: "spinner" }
            p { class: "viewer-loading-title", "Renderizando Etapa..." }
            p { class: "viewer-loading-message", "{message}" }
        }
    }
}

const fn next_message_index(current: usize) -> usize {
    (current + 1) % LOADING_MESSAGES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_messages_wrap_around() {
        let mut index = 0;
        for _ in 0..LOADING_MESSAGES.len() {
            index = next_message_index(index);
        }
        assert_eq!(index, 0);
        assert_eq!(next_message_index(1), 2);
    }
}
