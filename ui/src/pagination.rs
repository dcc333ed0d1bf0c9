use dioxus::prelude::*;
use std::collections::BTreeMap;
use std::future::Future;
use types::pagination::{PageLink, showing_range, visible_pages};
use types::{FetchTicket, Page, PageQuery, PageSize, PageState, Result};

/// Handle returned by [`use_pagination`].
///
/// Every change issues a ticket on the shared [`PageState`] and spawns the
/// fetch; the state only applies the response if its ticket is still the
/// latest one.
pub struct Paginated<T: 'static, F> {
    state: Signal<PageState<T>>,
    fetch: F,
}

impl<T: 'static, F: Copy> Clone for Paginated<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static, F: Copy> Copy for Paginated<T, F> {}

impl<T, F, Fut> Paginated<T, F>
where
    T: 'static,
    F: Fn(PageQuery) -> Fut + Copy + 'static,
    Fut: Future<Output = Result<Page<T>>> + 'static,
{
    /// Subscribe to the state and read it.
    pub fn state(&self) -> Signal<PageState<T>> {
        self.state
    }

    fn run(self, ticket: FetchTicket) {
        let mut state = self.state;
        let fetch = self.fetch;
        tracing::debug!(seq = ticket.seq, page = ticket.query.page, "fetching page");
        spawn(async move {
            let outcome = fetch(ticket.query.clone()).await;
            state.write().complete(&ticket, outcome);
        });
    }

    pub fn load(mut self) {
        let ticket = self.state.write().load();
        self.run(ticket);
    }

    pub fn set_search(mut self, term: String) {
        let ticket = self.state.write().set_search(term);
        self.run(ticket);
    }

    pub fn set_filters(mut self, filters: BTreeMap<String, String>) {
        let ticket = self.state.write().set_filters(filters);
        self.run(ticket);
    }

    pub fn set_filter(mut self, key: &str, value: Option<String>) {
        let ticket = self.state.write().set_filter(key, value);
        self.run(ticket);
    }

    pub fn handle_page_change(mut self, page: u32) {
        let ticket = self.state.write().handle_page_change(page);
        self.run(ticket);
    }

    pub fn handle_page_size_change(mut self, page_size: PageSize) {
        let ticket = self.state.write().handle_page_size_change(page_size);
        self.run(ticket);
    }

    pub fn refresh(mut self) {
        let ticket = self.state.write().refresh();
        self.run(ticket);
    }
}

/// Paginated, searchable, filterable list data starting at `page_size`.
/// Fetches the first page on mount.
///
/// `fetch` should only capture `Copy` handles (signals, the session), since
/// the hook keeps the one passed on the first render.
pub fn use_pagination<T, F, Fut>(page_size: PageSize, fetch: F) -> Paginated<T, F>
where
    T: 'static,
    F: Fn(PageQuery) -> Fut + Copy + 'static,
    Fut: Future<Output = Result<Page<T>>> + 'static,
{
    let state = use_signal(|| PageState::<T>::new(page_size));
    let paginated = use_hook(|| Paginated { state, fetch });

    use_effect(move || paginated.load());

    paginated
}

/// Page navigation with a page-size select. Hidden when there is at most one page.
#[component]
pub fn Pagination(
    current_page: u32,
    total_pages: u32,
    total_items: u64,
    page_size: PageSize,
    on_page_change: EventHandler<u32>,
    on_page_size_change: EventHandler<PageSize>,
) -> Element {
    if total_pages <= 1 {
        return rsx! {};
    }

    let (first, last) = showing_range(current_page, page_size.get(), total_items);
    let links = visible_pages(current_page, total_pages);

    rsx! {
        div { class: "pagination",
            div { class: "pagination-info",
                "Showing {first} to {last} of {total_items} entries"
            }
            div { class: "pagination-size",
                label { r#for: "page-size", "Show" }
                select {
                    id: "page-size",
                    class: "form-input form-input-sm",
                    value: "{page_size}",
                    onchange: move |e| {
                        if let Some(size) = e.value().parse::<u32>().ok().and_then(|n| PageSize::try_from(n).ok()) {
                            on_page_size_change.call(size);
                        }
                    },
                    for size in PageSize::options() {
                        option { key: "{size}", value: "{size}", selected: size == page_size, "{size}" }
                    }
                }
            }
            nav { class: "pagination-pages",
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: current_page <= 1,
                    onclick: move |_| on_page_change.call(current_page.saturating_sub(1).max(1)),
                    "Previous"
                }
                for (i, link) in links.into_iter().enumerate() {
                    {
                        match link {
                            PageLink::Page(page) => rsx! {
                                button {
                                    key: "{i}",
                                    class: if page == current_page { "btn btn-primary btn-sm" } else { "btn btn-secondary btn-sm" },
                                    onclick: move |_| on_page_change.call(page),
                                    "{page}"
                                }
                            },
                            PageLink::Ellipsis => rsx! {
                                span { key: "{i}", class: "pagination-ellipsis", "…" }
                            },
                        }
                    }
                }
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: current_page >= total_pages,
                    onclick: move |_| on_page_change.call(current_page + 1),
                    "Next"
                }
            }
        }
    }
}
