use crate::Route;
use dioxus::prelude::*;
use types::nav::{MENU, NavNode};

/// Menu label for `path`, searching groups too.
fn menu_label(menu: &'static [NavNode], path: &str) -> Option<&'static str> {
    menu.iter().find_map(|node| {
        if node.is_group() {
            menu_label(node.children, path)
        } else {
            (node.path == Some(path)).then_some(node.label)
        }
    })
}

#[component]
fn ComingSoon(#[props(into)] title: String) -> Element {
    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "{title}" }
            }
            div { class: "card",
                div { class: "card-body",
                    p { class: "text-muted", "This section is not available yet." }
                }
            }
        }
    }
}

#[component]
pub fn Inventory(section: String) -> Element {
    let path = format!("/inventory/{section}");
    let title = menu_label(MENU, &path).unwrap_or("Inventory");

    rsx! { ComingSoon { title } }
}

#[component]
pub fn Invoices(kind: String) -> Element {
    let path = format!("/invoices/{kind}");
    let title = menu_label(MENU, &path).unwrap_or("Invoices");

    rsx! { ComingSoon { title } }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                h1 { class: "login-title", "404" }
                p { class: "login-subtitle", "Nothing lives at {path}." }
                Link { to: Route::Dashboard {}, class: "btn btn-primary", "Back to Dashboard" }
            }
        }
    }
}
