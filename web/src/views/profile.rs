use super::components::{RoleBadge, TextField};
use crate::use_notice;
use dioxus::prelude::*;
use secrecy::SecretString;
use types::{FieldErrors, MIN_PASSWORD_LEN, PasswordChange, ProfileUpdate, format::format_date_time};
use ui::{FieldErrorList, use_session};

#[component]
pub fn Profile() -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let user = session.user();

    let mut username = use_signal(|| user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let mut email = use_signal(|| user.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let mut errors = use_signal(FieldErrors::new);
    let mut saving = use_signal(|| false);

    let Some(user) = user else {
        return rsx! {};
    };

    let save = move |_: MouseEvent| {
        let mut problems = FieldErrors::new();
        if username.read().trim().is_empty() {
            problems.add("username", "Username is required");
        }
        if email.read().trim().is_empty() {
            problems.add("email", "Email is required");
        }
        if !problems.is_empty() {
            errors.set(problems);
            return;
        }
        errors.set(FieldErrors::new());

        let update = ProfileUpdate {
            username: Some(username.read().trim().to_string()),
            email: Some(email.read().trim().to_string()),
        };
        spawn(async move {
            saving.set(true);
            let outcome = session.update_profile(update).await;
            saving.set(false);

            match outcome {
                Ok(_) => notice.success("Profile updated successfully"),
                Err(e) if !e.fields.is_empty() => errors.set(e.fields),
                Err(e) => notice.api_error(&e),
            }
        });
    };

    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "My Profile" }
            }
            div { class: "grid grid-cols-2",
                div { class: "card",
                    div { class: "card-header",
                        h2 { class: "card-title", "Account" }
                    }
                    div { class: "card-body",
                        div { class: "form-group",
                            span { class: "form-label", "Role" }
                            div { class: "form-value", RoleBadge { role: user.role } }
                        }
                        div { class: "form-group",
                            span { class: "form-label", "Branch" }
                            div { class: "form-value", {user.branch_name.clone().unwrap_or_else(|| "-".to_string())} }
                        }
                        div { class: "form-group",
                            span { class: "form-label", "Last Login" }
                            div { class: "form-value", {format_date_time(user.last_login)} }
                        }
                    }
                }
                div { class: "card",
                    div { class: "card-header",
                        h2 { class: "card-title", "Edit Profile" }
                    }
                    div { class: "card-body",
                        FieldErrorList { errors: errors().without(&["username", "email"]) }
                        TextField {
                            id: "username",
                            label: "Username",
                            value: username(),
                            on_input: move |v| username.set(v),
                            errors: errors(),
                        }
                        TextField {
                            id: "email",
                            label: "Email",
                            kind: "email",
                            value: email(),
                            on_input: move |v| email.set(v),
                            errors: errors(),
                        }
                        button {
                            class: "btn btn-primary",
                            disabled: saving(),
                            onclick: save,
                            if saving() { "Saving..." } else { "Save Changes" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ChangePassword() -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let mut old_password = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut errors = use_signal(FieldErrors::new);
    let mut saving = use_signal(|| false);

    let submit = move |_: MouseEvent| {
        let mut problems = FieldErrors::new();
        if old_password.read().is_empty() {
            problems.add("old_password", "Current password is required");
        }
        if new_password.read().chars().count() < MIN_PASSWORD_LEN {
            problems.add(
                "new_password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
            );
        }
        if *new_password.read() != *confirm.read() {
            problems.add("new_password_confirm", "Passwords do not match");
        }
        if !problems.is_empty() {
            errors.set(problems);
            return;
        }
        errors.set(FieldErrors::new());

        let change = PasswordChange {
            old_password: SecretString::from(old_password()),
            new_password: SecretString::from(new_password()),
            new_password_confirm: SecretString::from(confirm()),
        };
        spawn(async move {
            saving.set(true);
            let outcome = session.change_password(change).await;
            saving.set(false);

            match outcome {
                Ok(()) => {
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                    notice.success("Password changed successfully");
                }
                Err(e) if !e.fields.is_empty() => errors.set(e.fields),
                Err(e) => notice.api_error(&e),
            }
        });
    };

    // Server errors on fields this form has no input for.
    let unmatched = errors().without(&["old_password", "new_password", "new_password_confirm"]);

    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "Change Password" }
            }
            div { class: "card card-narrow",
                div { class: "card-body",
                    FieldErrorList { errors: unmatched }
                    TextField {
                        id: "old_password",
                        label: "Current Password",
                        kind: "password",
                        value: old_password(),
                        on_input: move |v| old_password.set(v),
                        errors: errors(),
                    }
                    TextField {
                        id: "new_password",
                        label: "New Password",
                        kind: "password",
                        value: new_password(),
                        on_input: move |v| new_password.set(v),
                        errors: errors(),
                    }
                    TextField {
                        id: "new_password_confirm",
                        label: "Confirm New Password",
                        kind: "password",
                        value: confirm(),
                        on_input: move |v| confirm.set(v),
                        errors: errors(),
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: saving(),
                        onclick: submit,
                        if saving() { "Saving..." } else { "Change Password" }
                    }
                }
            }
        }
    }
}
