use api::{Config, SessionState};
use dioxus::prelude::*;
use types::{Error, Guard, Role, User, guard, nav};
use ui::{AccessDenied, LoadingSpinner, Session, SessionProvider, use_session};

mod views;

use views::{
    ChangePassword, Dashboard, Inventory, Invoices, Login, NotFound, Profile, ReferenceList, Users,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[layout(AuthenticatedLayout)]
        #[route("/dashboard")]
        Dashboard {},
        #[route("/users")]
        Users {},
        #[route("/profile")]
        Profile {},
        #[route("/change-password")]
        ChangePassword {},
        #[route("/branches")]
        Branches {},
        #[route("/warehouses")]
        Warehouses {},
        #[route("/vendors")]
        Vendors {},
        #[route("/customers")]
        Customers {},
        #[route("/sellers")]
        Sellers {},
        #[route("/warehouse-transactions")]
        WarehouseTransactions {},
        #[route("/inventory/:section")]
        Inventory { section: String },
        #[route("/invoices/:kind")]
        Invoices { kind: String },
    #[end_layout]
    #[redirect("/", || Route::Dashboard {})]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    pub fn login() -> Self {
        Route::Login { error: None }
    }
}

#[component]
fn Branches() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::Branches } }
}

#[component]
fn Warehouses() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::Warehouses } }
}

#[component]
fn Vendors() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::Vendors } }
}

#[component]
fn Customers() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::Customers } }
}

#[component]
fn Sellers() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::Sellers } }
}

#[component]
fn WarehouseTransactions() -> Element {
    rsx! { ReferenceList { resource: api::CoreResource::WarehouseTransactions } }
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(Config::from_env);

    rsx! {
        document::Title { "Jewelry System" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        {
            match config {
                Ok(config) => rsx! {
                    SessionProvider { config, Router::<Route> {} }
                },
                Err(error) => rsx! {
                    div { class: "notice notice-error", "Invalid configuration: {error}" }
                },
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoticeInfo {
    pub kind: NoticeKind,
    pub message: String,
}

/// Success and error messages above the page - use `use_notice()` to access.
#[derive(Clone, Copy)]
pub struct Notice {
    current: Signal<Option<NoticeInfo>>,
    session: Session,
}

impl Notice {
    pub fn success(&mut self, message: impl Into<String>) {
        self.current.set(Some(NoticeInfo {
            kind: NoticeKind::Success,
            message: message.into(),
        }));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.current.set(Some(NoticeInfo {
            kind: NoticeKind::Error,
            message: message.into(),
        }));
    }

    /// Show an API failure. A 401 that survived the token refresh ends the
    /// session and goes back to the login page instead.
    pub fn api_error(&mut self, error: &Error) {
        if error.is_unauthorized() {
            self.session.expire();
            navigator().push(Route::Login {
                error: Some("Your session has expired. Please sign in again.".to_string()),
            });
            return;
        }
        self.error(error.message.clone());
    }

    pub fn clear(&mut self) {
        self.current.set(None);
    }
}

pub fn use_notice() -> Notice {
    use_context::<Notice>()
}

#[component]
fn NoticeBanner() -> Element {
    let mut notice = use_notice();
    let current = notice.current.read();

    let Some(info) = current.as_ref() else {
        return rsx! {};
    };
    let class = match info.kind {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };

    rsx! {
        div { class,
            span { class: "notice-message", "{info.message}" }
            button {
                class: "notice-close",
                onclick: move |_| notice.clear(),
                "×"
            }
        }
    }
}

#[component]
fn NavLink(path: &'static str, label: &'static str, icon: &'static str) -> Element {
    let current: Route = use_route();
    let current = current.to_string();
    let is_active = current == path || current.starts_with(&format!("{path}/"));

    let Ok(to) = path.parse::<Route>() else {
        tracing::warn!(path, "menu entry does not match a route");
        return rsx! {};
    };

    rsx! {
        Link {
            to,
            class: if is_active { "nav-link active" } else { "nav-link" },
            if !icon.is_empty() {
                i { class: "nav-icon {icon}" }
            }
            span { "{label}" }
        }
    }
}

#[component]
fn Sidebar(#[props(!optional)] role: Option<Role>) -> Element {
    let menu = nav::visible_menu(nav::MENU, role);

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-header",
                span { class: "sidebar-logo", "Jewelry System" }
            }
            nav { class: "sidebar-nav",
                for entry in menu {
                    if let Some(path) = entry.node.path {
                        NavLink { key: "{entry.node.label}", path, label: entry.node.label, icon: entry.node.icon }
                    } else {
                        div { key: "{entry.node.label}", class: "nav-group",
                            div { class: "nav-group-title",
                                i { class: "nav-icon {entry.node.icon}" }
                                span { "{entry.node.label}" }
                            }
                            for child in entry.children {
                                if let Some(path) = child.path {
                                    NavLink { key: "{path}", path, label: child.label, icon: child.icon }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Header(user: User) -> Element {
    let session = use_session();
    let mut signing_out = use_signal(|| false);

    let initial = user
        .username
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();

    rsx! {
        header { class: "header",
            div { class: "header-user",
                div { class: "header-avatar", "{initial}" }
                div { class: "header-user-info",
                    div { class: "header-user-name", "{user.username}" }
                    if let Some(role) = user.role {
                        span { class: "badge badge-{role.badge_variant()}", "{role}" }
                    }
                }
            }
            div { class: "header-actions",
                Link { to: Route::Profile {}, class: "btn btn-link", "Profile" }
                Link { to: Route::ChangePassword {}, class: "btn btn-link", "Change Password" }
                button {
                    class: "btn btn-secondary",
                    disabled: signing_out(),
                    onclick: move |_| {
                        signing_out.set(true);
                        spawn(async move {
                            session.logout().await;
                            navigator().replace(Route::login());
                        });
                    },
                    if signing_out() { "Signing out..." } else { "Sign out" }
                }
            }
        }
    }
}

#[component]
fn AuthenticatedLayout() -> Element {
    let session = use_session();
    let route: Route = use_route();
    use_context_provider(|| Notice {
        current: Signal::new(None),
        session,
    });

    match session.state() {
        SessionState::Authenticated(user) => {
            let path = route.to_string();
            let required = nav::required_roles(nav::MENU, &path).unwrap_or(&[]);
            let access = guard(Some(&user), required);

            rsx! {
                div { class: "app-layout",
                    Sidebar { role: user.role }
                    div { class: "main-column",
                        Header { user: user.clone() }
                        main { class: "main-content",
                            NoticeBanner {}
                            if access == Guard::Allow {
                                Outlet::<Route> {}
                            } else {
                                AccessDenied {}
                            }
                        }
                    }
                }
            }
        }
        SessionState::Anonymous => {
            navigator().push(Route::login());
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        _ => rsx! { LoadingSpinner {} },
    }
}
