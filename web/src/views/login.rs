use crate::Route;
use api::SessionState;
use dioxus::prelude::*;
use secrecy::SecretString;
use types::Credentials;
use ui::use_session;

#[component]
pub fn Login(error: Option<String>) -> Element {
    let session = use_session();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut failure = use_signal(|| error.clone());

    if let SessionState::Authenticated(_) = session.state() {
        navigator().replace(Route::Dashboard {});
    }

    let can_submit = !username.read().trim().is_empty() && !password.read().is_empty();

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "Jewelry System" }
                    p { class: "login-subtitle", "Sign in to your account" }
                }
                if let Some(message) = failure() {
                    div { class: "notice notice-error", "{message}" }
                }
                form {
                    onsubmit: move |e: FormEvent| {
                        e.prevent_default();
                        if !can_submit {
                            return;
                        }
                        let credentials = Credentials {
                            username: username.read().trim().to_string(),
                            password: SecretString::from(password.read().clone()),
                        };
                        spawn(async move {
                            submitting.set(true);
                            failure.set(None);
                            let outcome = session.login(credentials).await;
                            submitting.set(false);
                            match outcome {
                                Ok(_) => {
                                    navigator().replace(Route::Dashboard {});
                                }
                                Err(e) => {
                                    password.set(String::new());
                                    failure.set(Some(e.message));
                                }
                            }
                        });
                    },
                    div { class: "form-group",
                        label { class: "form-label", r#for: "username", "Username" }
                        input {
                            id: "username",
                            class: "form-input",
                            r#type: "text",
                            autocomplete: "username",
                            value: "{username}",
                            oninput: move |e| username.set(e.value()),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "password", "Password" }
                        input {
                            id: "password",
                            class: "form-input",
                            r#type: "password",
                            autocomplete: "current-password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary login-btn",
                        disabled: !can_submit || submitting(),
                        if submitting() { "Signing in..." } else { "Sign in" }
                    }
                }
            }
        }
    }
}
