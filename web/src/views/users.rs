use super::components::{ConfirmModal, Modal, RoleBadge, StatusBadge, TextField};
use crate::use_notice;
use api::CoreResource;
use dioxus::prelude::*;
use types::{
    FieldErrors, PageQuery, PageSize, Record, Role, SetPassword, StatusFilter, User, UserForm,
    format::format_date_time,
};
use ui::{FieldErrorList, LoadingSpinner, Pagination, use_pagination, use_session};

/// Fields the user form renders its own messages under.
const USER_FORM_INPUTS: &[&str] = &["username", "email", "password", "password_confirm"];
const SET_PASSWORD_INPUTS: &[&str] = &["new_password", "new_password_confirm"];

#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    Create,
    Edit(User),
    SetPassword(User),
    Delete(User),
}

#[component]
pub fn Users() -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let users = use_pagination(PageSize::default(), move |query: PageQuery| async move {
        session.api().list_users(&query).await
    });
    let mut dialog = use_signal(|| None::<Dialog>);
    let mut busy = use_signal(|| None::<i64>);
    let mut deleting = use_signal(|| false);

    let page = users.state().read().clone();
    let status = StatusFilter::from_filters(page.filters());
    let role_filter = page.filter("role").unwrap_or_default().to_string();

    let toggle_status = move |user_id: i64, was_active: bool| {
        spawn(async move {
            busy.set(Some(user_id));
            match session.api().toggle_user_status(user_id).await {
                Ok(()) => {
                    notice.success(if was_active {
                        "User deactivated successfully"
                    } else {
                        "User activated successfully"
                    });
                    users.refresh();
                }
                Err(e) => notice.api_error(&e),
            }
            busy.set(None);
        });
    };

    let restore = move |user_id: i64| {
        spawn(async move {
            busy.set(Some(user_id));
            match session.api().restore_user(user_id).await {
                Ok(()) => {
                    notice.success("User restored successfully");
                    users.refresh();
                }
                Err(e) => notice.api_error(&e),
            }
            busy.set(None);
        });
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "User Management" }
                    p { class: "page-subtitle", "Manage staff accounts, roles and branch assignments." }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| dialog.set(Some(Dialog::Create)),
                        "Add User"
                    }
                }
            }

            div { class: "card",
                div { class: "filters",
                    input {
                        class: "form-input",
                        r#type: "search",
                        placeholder: "Search users...",
                        value: "{page.search()}",
                        oninput: move |e| users.set_search(e.value()),
                    }
                    select {
                        class: "form-input",
                        value: "{role_filter}",
                        onchange: move |e| users.set_filter("role", Some(e.value())),
                        option { value: "", selected: role_filter.is_empty(), "All Roles" }
                        for role in Role::ALL {
                            option { key: "{role}", value: "{role}", selected: role_filter == role.as_str(), "{role}" }
                        }
                    }
                    select {
                        class: "form-input",
                        value: "{status.as_str()}",
                        onchange: move |e| {
                            let filters = StatusFilter::parse(&e.value()).apply(users.state().read().filters());
                            users.set_filters(filters);
                        },
                        for choice in StatusFilter::ALL {
                            option { key: "{choice.label()}", value: "{choice.as_str()}", selected: choice == status, "{choice.label()}" }
                        }
                    }
                }

                if let Some(error) = page.error() {
                    div { class: "notice notice-error", "{error}" }
                }

                if page.loading() && page.data().is_empty() {
                    LoadingSpinner { message: "Loading users..." }
                } else if page.data().is_empty() {
                    p { class: "empty-state", "No users found" }
                } else {
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "Username" }
                                    th { "Email" }
                                    th { "Role" }
                                    th { "Branch" }
                                    th { "Status" }
                                    th { "Last Login" }
                                    th { "Actions" }
                                }
                            }
                            tbody {
                                for user in page.data().iter().cloned() {
                                    {
                                        let user_id = user.id;
                                        let is_active = user.is_active;
                                        let is_busy = busy() == Some(user_id);
                                        let branch = user.branch_name.clone().unwrap_or_else(|| "-".to_string());
                                        let last_login = match user.last_login {
                                            Some(ts) => format_date_time(Some(ts)),
                                            None => "Never".to_string(),
                                        };
                                        let edit_user = user.clone();
                                        let password_user = user.clone();
                                        let delete_user = user.clone();

                                        rsx! {
                                            tr { key: "{user_id}",
                                                td { "{user.username}" }
                                                td { "{user.email}" }
                                                td { RoleBadge { role: user.role } }
                                                td { "{branch}" }
                                                td { StatusBadge { active: is_active } }
                                                td { "{last_login}" }
                                                td { class: "table-actions",
                                                    if status == StatusFilter::Deleted {
                                                        button {
                                                            class: "btn btn-secondary btn-sm",
                                                            disabled: is_busy,
                                                            onclick: move |_| restore(user_id),
                                                            "Restore"
                                                        }
                                                    } else {
                                                        button {
                                                            class: "btn btn-link btn-sm",
                                                            onclick: move |_| dialog.set(Some(Dialog::Edit(edit_user.clone()))),
                                                            "Edit"
                                                        }
                                                        button {
                                                            class: "btn btn-link btn-sm",
                                                            disabled: is_busy,
                                                            onclick: move |_| toggle_status(user_id, is_active),
                                                            if is_active { "Deactivate" } else { "Activate" }
                                                        }
                                                        button {
                                                            class: "btn btn-link btn-sm",
                                                            onclick: move |_| dialog.set(Some(Dialog::SetPassword(password_user.clone()))),
                                                            "Change Password"
                                                        }
                                                        button {
                                                            class: "btn btn-link btn-sm text-danger",
                                                            onclick: move |_| dialog.set(Some(Dialog::Delete(delete_user.clone()))),
                                                            "Delete"
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                Pagination {
                    current_page: page.current_page(),
                    total_pages: page.total_pages(),
                    total_items: page.total_items(),
                    page_size: page.page_size(),
                    on_page_change: move |n| users.handle_page_change(n),
                    on_page_size_change: move |size| users.handle_page_size_change(size),
                }
            }

            {
                match dialog() {
                    None => rsx! {},
                    Some(Dialog::Create) => rsx! {
                        UserFormModal {
                            user: None,
                            on_close: move |_| dialog.set(None),
                            on_saved: move |_| {
                                dialog.set(None);
                                users.refresh();
                            },
                        }
                    },
                    Some(Dialog::Edit(user)) => rsx! {
                        UserFormModal {
                            user: Some(user),
                            on_close: move |_| dialog.set(None),
                            on_saved: move |_| {
                                dialog.set(None);
                                users.refresh();
                            },
                        }
                    },
                    Some(Dialog::SetPassword(user)) => rsx! {
                        SetPasswordModal { user, on_close: move |_| dialog.set(None) }
                    },
                    Some(Dialog::Delete(user)) => {
                        let user_id = user.id;
                        rsx! {
                            ConfirmModal {
                                title: "Delete User",
                                message: format!("Are you sure you want to delete {}?", user.username),
                                warning: "Deleted users can be restored from the Deleted status filter.".to_string(),
                                confirm_label: "Delete",
                                busy: deleting(),
                                on_close: move |_| dialog.set(None),
                                on_confirm: move |_| {
                                    spawn(async move {
                                        deleting.set(true);
                                        match session.api().delete_user(user_id).await {
                                            Ok(()) => {
                                                notice.success("User deleted successfully");
                                                users.refresh();
                                            }
                                            Err(e) => notice.api_error(&e),
                                        }
                                        deleting.set(false);
                                        dialog.set(None);
                                    });
                                },
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn UserFormModal(
    #[props(!optional)] user: Option<User>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let editing = user.is_some();
    let user_id = user.as_ref().map(|u| u.id);

    let mut form = use_signal(|| user.as_ref().map(UserForm::from).unwrap_or_default());
    let mut errors = use_signal(FieldErrors::new);
    let mut summary = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);
    let mut branches = use_signal(Vec::<Record>::new);

    use_effect(move || {
        let api = session.api();
        spawn(async move {
            match api.list_records(CoreResource::Branches, &PageQuery::new(1, 100)).await {
                Ok(page) => branches.set(page.results),
                Err(error) => tracing::debug!(%error, "branch list unavailable"),
            }
        });
    });

    let submit = move |_: MouseEvent| {
        let current = form.read().clone();
        summary.set(None);
        let problems = current.validate(editing);
        if !problems.is_empty() {
            errors.set(problems);
            return;
        }
        errors.set(FieldErrors::new());

        let payload = current.payload(editing);
        spawn(async move {
            saving.set(true);
            let api = session.api();
            let outcome = match user_id {
                Some(id) => api.update_user(id, &payload).await,
                None => api.create_user(&payload).await,
            };
            saving.set(false);

            match outcome {
                Ok(()) => {
                    notice.success(if editing {
                        "User updated successfully"
                    } else {
                        "User created successfully"
                    });
                    on_saved.call(());
                }
                Err(e) if !e.fields.is_empty() => {
                    summary.set(Some(e.message));
                    errors.set(e.fields);
                }
                Err(e) => notice.api_error(&e),
            }
        });
    };

    let current = form.read().clone();
    let field_errors = errors.read().clone();
    let unmatched = field_errors.without(USER_FORM_INPUTS);
    let password_label: &'static str = if editing {
        "New Password (leave blank to keep)"
    } else {
        "Password *"
    };

    rsx! {
        Modal {
            title: if editing { "Edit User" } else { "Create User" },
            on_close,
            busy: saving(),
            footer: rsx! {
                button {
                    class: "btn btn-secondary",
                    disabled: saving(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: saving(),
                    onclick: submit,
                    if saving() { "Saving..." } else if editing { "Update" } else { "Create" }
                }
            },
            if let Some(message) = summary() {
                div { class: "notice notice-error", "{message}" }
            }
            FieldErrorList { errors: unmatched }
            TextField {
                id: "username",
                label: "Username *",
                value: current.username.clone(),
                on_input: move |v| form.write().username = v,
                errors: field_errors.clone(),
            }
            TextField {
                id: "email",
                label: "Email *",
                kind: "email",
                value: current.email.clone(),
                on_input: move |v| form.write().email = v,
                errors: field_errors.clone(),
            }
            div { class: "form-group",
                label { class: "form-label", r#for: "role", "Role" }
                select {
                    id: "role",
                    class: "form-input",
                    value: "{current.role}",
                    onchange: move |e| {
                        if let Some(role) = Role::parse(&e.value()) {
                            form.write().role = role;
                        }
                    },
                    for role in Role::ALL {
                        option { key: "{role}", value: "{role}", selected: current.role == role, "{role}" }
                    }
                }
            }
            div { class: "form-group",
                label { class: "form-label", r#for: "branch", "Branch" }
                select {
                    id: "branch",
                    class: "form-input",
                    onchange: move |e| form.write().branch = e.value().parse().ok(),
                    option { value: "", selected: current.branch.is_none(), "No branch" }
                    for branch in branches.read().iter() {
                        option {
                            key: "{branch.id}",
                            value: "{branch.id}",
                            selected: current.branch == Some(branch.id),
                            "{branch.label()}"
                        }
                    }
                }
            }
            div { class: "form-group",
                label { class: "checkbox-label",
                    input {
                        r#type: "checkbox",
                        checked: current.is_active,
                        onchange: move |e| form.write().is_active = e.checked(),
                    }
                    span { "Active" }
                }
            }
            TextField {
                id: "password",
                label: password_label,
                kind: "password",
                value: current.password.clone(),
                on_input: move |v| form.write().password = v,
                errors: field_errors.clone(),
            }
            TextField {
                id: "password_confirm",
                label: "Confirm Password",
                kind: "password",
                value: current.password_confirm.clone(),
                on_input: move |v| form.write().password_confirm = v,
                errors: field_errors,
            }
        }
    }
}

#[component]
fn SetPasswordModal(user: User, on_close: EventHandler<()>) -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let mut new_password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut errors = use_signal(FieldErrors::new);
    let mut summary = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);
    let user_id = user.id;

    let submit = move |_: MouseEvent| {
        let body = SetPassword {
            new_password: new_password(),
            new_password_confirm: confirm(),
        };
        summary.set(None);
        let problems = body.validate();
        if !problems.is_empty() {
            errors.set(problems);
            return;
        }
        errors.set(FieldErrors::new());

        spawn(async move {
            saving.set(true);
            let outcome = session.api().change_user_password(user_id, &body).await;
            saving.set(false);

            match outcome {
                Ok(()) => {
                    notice.success("Password changed successfully");
                    on_close.call(());
                }
                Err(e) if !e.fields.is_empty() => {
                    summary.set(Some(e.message));
                    errors.set(e.fields);
                }
                Err(e) => notice.api_error(&e),
            }
        });
    };

    rsx! {
        Modal {
            title: format!("Change Password for {}", user.username),
            on_close,
            busy: saving(),
            small: true,
            footer: rsx! {
                button {
                    class: "btn btn-secondary",
                    disabled: saving(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: saving(),
                    onclick: submit,
                    if saving() { "Saving..." } else { "Change Password" }
                }
            },
            if let Some(message) = summary() {
                div { class: "notice notice-error", "{message}" }
            }
            FieldErrorList { errors: errors().without(SET_PASSWORD_INPUTS) }
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
        }
    }
}
