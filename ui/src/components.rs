use dioxus::prelude::*;
use types::FieldErrors;

#[component]
pub fn LoadingSpinner(#[props(default = "Loading...".to_string())] message: String) -> Element {
    rsx! {
        div { class: "loading",
            div { class: "spinner" }
            span { "{message}" }
        }
    }
}

/// Shown in place of a view the signed-in role may not open.
#[component]
pub fn AccessDenied() -> Element {
    rsx! {
        div { class: "access-denied",
            h2 { class: "access-denied-title", "Access Denied" }
            p { class: "text-muted", "You don't have permission to access this page." }
        }
    }
}

/// Inline messages for one form field.
#[component]
pub fn FieldError(errors: FieldErrors, field: &'static str) -> Element {
    match errors.joined(field) {
        Some(message) => rsx! {
            p { class: "form-error", "{message}" }
        },
        None => rsx! {},
    }
}

/// Every field error as a list, for forms that don't render them inline.
#[component]
pub fn FieldErrorList(errors: FieldErrors) -> Element {
    if errors.is_empty() {
        return rsx! {};
    }

    rsx! {
        ul { class: "form-error-list",
            for (field, messages) in errors.iter() {
                li { key: "{field}",
                    strong { "{field}: " }
                    {messages.join(", ")}
                }
            }
        }
    }
}
