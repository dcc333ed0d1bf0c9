use super::components::{ConfirmModal, Modal};
use crate::use_notice;
use api::CoreResource;
use dioxus::prelude::*;
use types::{
    FieldErrors, PageQuery, PageSize, Record, STAFF_ROLES, format::truncate_text, has_permission,
    record_payload, scalar_columns,
};
use ui::{FieldErrorList, LoadingSpinner, Pagination, use_pagination, use_session};

#[derive(Clone, Debug, PartialEq)]
enum Editing {
    New,
    Existing(Record),
}

const MAX_COLUMNS: usize = 6;
const MAX_CELL_LEN: usize = 40;

/// Searchable, paginated table for one reference-data collection.
#[component]
pub fn ReferenceList(resource: CoreResource) -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let records = use_pagination(PageSize::default(), move |query: PageQuery| async move {
        session.api().list_records(resource, &query).await
    });
    let mut pending_delete = use_signal(|| None::<Record>);
    let mut deleting = use_signal(|| false);
    let mut editing = use_signal(|| None::<Editing>);

    let can_edit = session
        .user()
        .is_some_and(|user| has_permission(STAFF_ROLES, user.role));
    let page = records.state().read().clone();
    let columns = scalar_columns(page.data(), MAX_COLUMNS);
    let noun = resource.noun();
    let title = resource.title();
    let confirming = pending_delete().map(|record| (record.id, record.label()));

    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "{title}" }
            }
            div { class: "card",
                div { class: "filters",
                    input {
                        class: "form-input",
                        r#type: "search",
                        placeholder: "Search {title.to_lowercase()}...",
                        value: "{page.search()}",
                        oninput: move |e| records.set_search(e.value()),
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| records.refresh(),
                        "Refresh"
                    }
                    if can_edit && !columns.is_empty() {
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| editing.set(Some(Editing::New)),
                            "Add {noun}"
                        }
                    }
                }

                if let Some(error) = page.error() {
                    div { class: "notice notice-error", "{error}" }
                }

                if page.loading() && page.data().is_empty() {
                    LoadingSpinner {}
                } else if page.data().is_empty() {
                    p { class: "empty-state", "No {title.to_lowercase()} found" }
                } else {
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "ID" }
                                    for column in columns.iter() {
                                        th { key: "{column}", "{column}" }
                                    }
                                    if can_edit {
                                        th { "Actions" }
                                    }
                                }
                            }
                            tbody {
                                for record in page.data().iter() {
                                    {
                                        let target = record.clone();
                                        let edited = record.clone();
                                        let cells: Vec<String> = columns
                                            .iter()
                                            .map(|c| truncate_text(&record.display(c), MAX_CELL_LEN))
                                            .collect();

                                        rsx! {
                                            tr { key: "{record.id}",
                                                td { "{record.id}" }
                                                for (i, cell) in cells.into_iter().enumerate() {
                                                    td { key: "{i}", "{cell}" }
                                                }
                                                if can_edit {
                                                    td { class: "table-actions",
                                                        button {
                                                            class: "btn btn-link btn-sm",
                                                            onclick: move |_| editing.set(Some(Editing::Existing(edited.clone()))),
                                                            "Edit"
                                                        }
                                                        button {
                                                            class: "btn btn-link btn-sm text-danger",
                                                            onclick: move |_| pending_delete.set(Some(target.clone())),
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
                    on_page_change: move |n| records.handle_page_change(n),
                    on_page_size_change: move |size| records.handle_page_size_change(size),
                }
            }

            if let Some(target) = editing() {
                RecordFormModal {
                    resource,
                    target,
                    columns: columns.clone(),
                    sample: page.data().to_vec(),
                    on_close: move |_| editing.set(None),
                    on_saved: move |_| {
                        editing.set(None);
                        records.refresh();
                    },
                }
            }

            if let Some((id, label)) = confirming {
                ConfirmModal {
                    title: format!("Delete {noun}"),
                    message: format!("Are you sure you want to delete {label}?"),
                    warning: "This action cannot be undone.".to_string(),
                    confirm_label: "Delete",
                    busy: deleting(),
                    on_close: move |_| pending_delete.set(None),
                    on_confirm: move |_| {
                        spawn(async move {
                            deleting.set(true);
                            match session.api().delete_record(resource, id).await {
                                Ok(()) => {
                                    notice.success(format!("Deleted {noun} #{id}"));
                                    records.refresh();
                                }
                                Err(e) => notice.api_error(&e),
                            }
                            deleting.set(false);
                            pending_delete.set(None);
                        });
                    },
                }
            }
        }
    }
}

/// Create or edit one record through the columns the list shows.
#[component]
fn RecordFormModal(
    resource: CoreResource,
    target: Editing,
    columns: Vec<String>,
    sample: Vec<Record>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let session = use_session();
    let mut notice = use_notice();
    let existing = match &target {
        Editing::Existing(record) => Some(record.clone()),
        Editing::New => None,
    };
    let record_id = existing.as_ref().map(|r| r.id);

    let mut values = use_signal(|| {
        columns
            .iter()
            .map(|c| {
                let text = existing.as_ref().map(|r| r.raw_text(c)).unwrap_or_default();
                (c.clone(), text)
            })
            .collect::<Vec<_>>()
    });
    let mut errors = use_signal(FieldErrors::new);
    let mut summary = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);
    let noun = resource.noun();

    let submit = move |_: MouseEvent| {
        summary.set(None);
        errors.set(FieldErrors::new());
        let body = record_payload(&values.read(), &sample);

        spawn(async move {
            saving.set(true);
            let api = session.api();
            let outcome = match record_id {
                Some(id) => api.update_record(resource, id, &body).await,
                None => api.create_record(resource, &body).await,
            };
            saving.set(false);

            match outcome {
                Ok(saved) => {
                    notice.success(format!("Saved {noun} {}", saved.label()));
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

    let title = match record_id {
        Some(id) => format!("Edit {noun} #{id}"),
        None => format!("Add {noun}"),
    };
    let field_errors = errors();
    let shown: Vec<&str> = columns.iter().map(String::as_str).collect();
    let unmatched = field_errors.without(&shown);

    rsx! {
        Modal {
            title,
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
                    if saving() { "Saving..." } else { "Save" }
                }
            },
            if let Some(message) = summary() {
                div { class: "notice notice-error", "{message}" }
            }
            FieldErrorList { errors: unmatched }
            for (i, (column, text)) in values().into_iter().enumerate() {
                div { key: "{column}", class: "form-group",
                    label { class: "form-label", r#for: "{column}", "{column}" }
                    input {
                        id: "{column}",
                        class: if field_errors.get(&column).is_some() { "form-input form-input-invalid" } else { "form-input" },
                        value: "{text}",
                        oninput: move |e| {
                            if let Some(slot) = values.write().get_mut(i) {
                                slot.1 = e.value();
                            }
                        },
                    }
                    if let Some(message) = field_errors.joined(&column) {
                        p { class: "form-error", "{message}" }
                    }
                }
            }
        }
    }
}
