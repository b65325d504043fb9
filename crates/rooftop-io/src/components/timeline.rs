//! Vertical timeline of construction stages.
//!
//! One entry per catalog stage. Clicking an entry asks the session for
//! that stage, which either switches to a cached render or starts a new
//! one. Entries are styled by their [`StageStatus`].

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdBrickWall, LdBuilding, LdCheck, LdHammer, LdPaintRoller};
use rooftop_stages::{Stage, StageConfig, StageIcon, StageStatus, catalog};

/// Props for the [`Timeline`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TimelineProps {
    /// Status of every catalog stage, in catalog order.
    statuses: Vec<(Stage, StageStatus)>,
    /// Number of stages with a cached render.
    generated: usize,
    /// Callback fired when an enabled entry is clicked.
    on_select: EventHandler<Stage>,
}

/// Construction timeline with a generated-count badge.
#[component]
pub fn Timeline(props: TimelineProps) -> Element {
    let generated = props.generated;
    let total = catalog().len();

    rsx! {
        div { class: "timeline",
            div { class: "timeline-header",
                h2 { "Timeline" }
                span { class: "timeline-count", "{generated} / {total}" }
            }

            div { class: "timeline-entries",
                for config in catalog() {
                    {render_entry(config, status_of(&props.statuses, config.id), &props.on_select)}
                }
            }
        }
    }
}

fn status_of(statuses: &[(Stage, StageStatus)], stage: Stage) -> StageStatus {
    statuses
        .iter()
        .find(|(s, _)| *s == stage)
        .map_or(
            StageStatus {
                is_active: false,
                is_generated: false,
                is_enabled: false,
            },
            |&(_, status)| status,
        )
}

/// Render a single timeline entry.
fn render_entry(
    config: &'static StageConfig,
    status: StageStatus,
    on_select: &EventHandler<Stage>,
) -> Element {
    let state_class = if status.is_active {
        "timeline-entry--active"
    } else if status.is_generated {
        "timeline-entry--generated"
    } else {
        "timeline-entry--pending"
    };
    let disabled_class = if status.is_enabled {
        ""
    } else {
        "timeline-entry--disabled"
    };

    let onclick = {
        let on_select = *on_select;
        let stage = config.id;
        move |_| on_select.call(stage)
    };

    rsx! {
        button {
            class: "timeline-entry {state_class} {disabled_class}",
            disabled: !status.is_enabled,
            onclick: onclick,
            aria_label: "{config.title}",
            "aria-pressed": "{status.is_active}",

            div { class: "timeline-icon",
                {render_icon(config.icon)}
            }
            div { class: "timeline-body",
                div { class: "timeline-title-row",
                    span { class: "timeline-title", "{config.title}" }
                    if status.is_generated && !status.is_active {
                        span { class: "timeline-done",
                            Icon { width: 10, height: 10, icon: LdCheck }
                        }
                    }
                }
                p { class: "timeline-description", "{config.description}" }
            }
        }
    }
}

fn render_icon(icon: StageIcon) -> Element {
    match icon {
        StageIcon::Bricks => rsx! { Icon { width: 20, height: 20, icon: LdBrickWall } },
        StageIcon::Hammer => rsx! { Icon { width: 20, height: 20, icon: LdHammer } },
        StageIcon::PaintRoller => rsx! { Icon { width: 20, height: 20, icon: LdPaintRoller } },
        StageIcon::HouseCheck => rsx! { Icon { width: 20, height: 20, icon: LdBuilding } },
    }
}
