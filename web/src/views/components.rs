use dioxus::prelude::*;
use types::{FieldErrors, Role, format::status_variant};
use ui::FieldError;

/// Overlay with a header and close button. Clicking outside closes it unless `busy`.
#[component]
pub fn Modal(
    #[props(into)] title: String,
    on_close: EventHandler<()>,
    #[props(default)] busy: bool,
    #[props(default)] small: bool,
    children: Element,
    footer: Element,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !busy { on_close.call(()) },
            div { class: if small { "modal modal-sm" } else { "modal" },
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    if !busy {
                        button {
                            class: "modal-close",
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }
                }
                div { class: "modal-body", {children} }
                div { class: "modal-footer", {footer} }
            }
        }
    }
}

#[component]
pub fn ConfirmModal(
    #[props(into)] title: String,
    #[props(into)] message: String,
    #[props(into)] confirm_label: String,
    busy: bool,
    on_close: EventHandler<()>,
    on_confirm: EventHandler<()>,
    #[props(default)] warning: Option<String>,
) -> Element {
    rsx! {
        Modal {
            title,
            on_close,
            busy,
            small: true,
            footer: rsx! {
                button {
                    class: "btn btn-secondary",
                    disabled: busy,
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-danger",
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy { "Working..." } else { "{confirm_label}" }
                }
            },
            p { "{message}" }
            if let Some(warning) = warning {
                p { class: "text-muted", "{warning}" }
            }
        }
    }
}

#[component]
pub fn RoleBadge(#[props(!optional)] role: Option<Role>) -> Element {
    match role {
        Some(role) => rsx! {
            span { class: "badge badge-{role.badge_variant()}", "{role}" }
        },
        None => rsx! {
            span { class: "badge badge-secondary", "No role" }
        },
    }
}

#[component]
pub fn StatusBadge(active: bool) -> Element {
    let label = if active { "Active" } else { "Inactive" };
    let variant = status_variant(label);

    rsx! {
        span { class: "badge badge-{variant}", "{label}" }
    }
}

/// Labelled input with the messages for its field underneath. `id` doubles as the field name.
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: String,
    on_input: EventHandler<String>,
    #[props(default = "text")] kind: &'static str,
    #[props(default)] errors: FieldErrors,
) -> Element {
    let invalid = errors.get(id).is_some();

    rsx! {
        div { class: "form-group",
            label { class: "form-label", r#for: id, "{label}" }
            input {
                id,
                class: if invalid { "form-input form-input-invalid" } else { "form-input" },
                r#type: kind,
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
            FieldError { errors, field: id }
        }
    }
}
