use std::rc::Rc;

use dioxus::prelude::*;
use rooftop_gen::{GeminiClient, GeneratorConfig, ImageTransformer};
use rooftop_io::{FileUpload, Timeline, Viewer};
use rooftop_stages::{ImagePayload, Request, Session, Stage, catalog, now_millis};

fn main() {
    dioxus::launch(app);
}

/// Build the shared image client from the key baked in at compile time.
fn build_client() -> Option<Rc<GeminiClient>> {
    let config = GeneratorConfig::new(env!("ROOFTOP_API_KEY"));
    match GeminiClient::new(config) {
        Ok(client) => Some(Rc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "failed to build image client");
            None
        }
    }
}

/// Root application component.
///
/// Owns the [`Session`] signal and the image client, and wires together
/// the viewer, the upload actions and the construction timeline.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut session = use_signal(Session::new);
    let client = use_hook(build_client);

    // --- Stage select handler ---
    // Either switches to a cached render or starts a new one. The session
    // drops the result of a render that a later upload or clear made stale.
    let on_select = move |stage: Stage| {
        let request = session.write().request(stage);
        match request {
            Ok(Request::Cached(stage)) => {
                tracing::debug!(%stage, "showing cached render");
            }
            Ok(Request::Started(ticket)) => {
                let Some(client) = client.clone() else {
                    session.write().complete(
                        ticket,
                        Err::<ImagePayload, _>("image client unavailable"),
                        now_millis(),
                    );
                    return;
                };
                spawn(async move {
                    let outcome = client.render(&ticket).await;
                    session.write().complete(ticket, outcome, now_millis());
                });
            }
            Err(e) => {
                tracing::debug!(%stage, error = %e, "stage request ignored");
            }
        }
    };

    // --- Viewer handlers ---
    let on_download = move |()| {
        let Some(download) = session.read().download(now_millis()) else {
            return;
        };
        if let Err(e) = rooftop_io::save(&download) {
            tracing::error!(error = %e, "download failed");
        }
    };

    // --- Snapshot for rendering ---
    let snapshot = session.read();
    let image = snapshot.display().map(ImagePayload::to_data_uri);
    let title = snapshot.active_title().to_owned();
    let loading = snapshot.is_loading();
    let error = snapshot.error().map(str::to_owned);
    let has_base = snapshot.base_image().is_some();
    let generated = snapshot.generated_count();
    let statuses: Vec<_> = catalog()
        .iter()
        .map(|config| (config.id, snapshot.stage_status(config.id)))
        .collect();
    drop(snapshot);

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/app.css") }

        div { class: "app",
            header { class: "app-header",
                div { class: "app-tag", "AI Vision Architecture" }
                h1 { class: "app-title", "Rooftop Vision Builder" }
                p { class: "app-subtitle",
                    "Transforme seus projetos arquitetônicos em renders hiper-realistas através de todas as etapas de construção usando inteligência artificial generativa."
                }
            }

            main { class: "app-main",
                // Left column: viewer and actions
                div { class: "app-viewer-column",
                    Viewer {
                        image: image,
                        title: title,
                        loading: loading,
                        error: error,
                        on_dismiss_error: move |()| session.write().dismiss_error(),
                        on_compare: move |show: bool| session.write().set_show_original(show),
                        on_download: on_download,
                    }

                    div { class: "app-actions",
                        FileUpload {
                            has_base: has_base,
                            on_upload: move |payload: ImagePayload| session.write().upload(payload),
                        }
                        if has_base {
                            button {
                                class: "btn btn-secondary",
                                onclick: move |_| session.write().clear_stages(),
                                "Limpar Etapas"
                            }
                            button {
                                class: "btn btn-secondary",
                                onclick: move |_| session.write().clear_base(),
                                "Novo Projeto"
                            }
                        }
                    }
                }

                // Right column: construction timeline
                div { class: "app-timeline-column",
                    Timeline {
                        statuses: statuses,
                        generated: generated,
                        on_select: on_select,
                    }
                }
            }
        }
    }
}
