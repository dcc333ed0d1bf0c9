//! Page/size/search/filter state for list screens.
//!
//! [`PageState`] is a synchronous state machine. Every operation that needs
//! data returns a [`FetchTicket`]; the caller runs the fetch and hands the
//! outcome back through [`PageState::complete`]. Tickets are numbered, and only
//! the most recently issued one is applied, so a slow response can never
//! overwrite a newer one.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Page sizes offered by the page-size select.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// A page size from [`PAGE_SIZE_OPTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(u32);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(10);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn options() -> impl Iterator<Item = PageSize> {
        PAGE_SIZE_OPTIONS.into_iter().map(PageSize)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = Error;

    fn try_from(size: u32) -> Result<Self> {
        if PAGE_SIZE_OPTIONS.contains(&size) {
            Ok(PageSize(size))
        } else {
            Err(crate::err!("unsupported page size {size}"))
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    /// A one-row query, used when only the count matters.
    pub fn count_only() -> Self {
        Self::new(1, 1)
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Query-string pairs: `page`, `page_size`, `search`, then each filter.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
            ("search".to_string(), self.search.clone()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

/// A page of results as returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: u64) -> Self {
        Self { results, count }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire<T> {
            Paginated {
                #[serde(default = "Vec::new")]
                results: Vec<T>,
                #[serde(default)]
                count: Option<u64>,
            },
            Bare(Vec<T>),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Paginated { results, count } => Page {
                count: count.unwrap_or(0),
                results,
            },
            Wire::Bare(results) => Page {
                count: results.len() as u64,
                results,
            },
        })
    }
}

/// `ceil(count / page_size)`; zero when there is nothing to show.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(u64::from(page_size)) as u32
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: PageQuery,
}

/// State behind a paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    data: Vec<T>,
    loading: bool,
    error: Option<String>,
    current_page: u32,
    page_size: PageSize,
    total_items: u64,
    total_pages: u32,
    search: String,
    filters: BTreeMap<String, String>,
    issued: u64,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}

impl<T> PageState<T> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            page_size,
            total_items: 0,
            total_pages: 0,
            search: String::new(),
            filters: BTreeMap::new(),
            issued: 0,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Fetch whatever page is current. Used on mount.
    pub fn load(&mut self) -> FetchTicket {
        self.issue(self.current_page)
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> FetchTicket {
        self.search = term.into();
        self.issue(1)
    }

    /// Replace every filter at once.
    pub fn set_filters(&mut self, filters: BTreeMap<String, String>) -> FetchTicket {
        self.filters = filters;
        self.issue(1)
    }

    /// Set or clear (with `None` or an empty value) one filter key.
    pub fn set_filter(&mut self, key: impl Into<String>, value: Option<String>) -> FetchTicket {
        let key = key.into();
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.filters.insert(key, value);
            }
            None => {
                self.filters.remove(&key);
            }
        }
        self.issue(1)
    }

    /// Go to `page`. Not checked against `total_pages`.
    pub fn handle_page_change(&mut self, page: u32) -> FetchTicket {
        self.issue(page)
    }

    pub fn handle_page_size_change(&mut self, page_size: PageSize) -> FetchTicket {
        self.page_size = page_size;
        self.issue(1)
    }

    pub fn refresh(&mut self) -> FetchTicket {
        self.issue(self.current_page)
    }

    /// Whether `ticket` is the latest one issued.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.issued
    }

    /// Apply the outcome of a fetch. Returns `false` if the ticket was stale
    /// and the outcome was dropped.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: Result<Page<T>>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                "discarding stale page response"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(page) => {
                self.total_items = page.count;
                self.total_pages = total_pages(page.count, ticket.query.page_size);
                self.data = page.results;
                self.error = None;
            }
            Err(error) => {
                self.data.clear();
                self.error = Some(if error.message.is_empty() {
                    crate::GENERIC_MESSAGE.to_string()
                } else {
                    error.message
                });
            }
        }
        true
    }

    fn issue(&mut self, page: u32) -> FetchTicket {
        self.current_page = page.max(1);
        self.issued += 1;
        self.loading = true;
        self.error = None;

        FetchTicket {
            seq: self.issued,
            query: PageQuery {
                page: self.current_page,
                page_size: self.page_size.get(),
                search: self.search.clone(),
                filters: self.filters.clone(),
            },
        }
    }
}

/// One slot in the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

/// Page numbers around `current`, always including the first and last page,
/// with ellipses where pages are skipped.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageLink> {
    const DELTA: u32 = 2;

    if total == 0 {
        return Vec::new();
    }
    if total == 1 {
        return vec![PageLink::Page(1)];
    }

    let start = current.saturating_sub(DELTA).max(2);
    let end = current.saturating_add(DELTA).min(total - 1);

    let mut links = vec![PageLink::Page(1)];
    if current > DELTA + 2 {
        links.push(PageLink::Ellipsis);
    }
    links.extend((start..=end).map(PageLink::Page));
    if current.saturating_add(DELTA) < total - 1 {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total));
    links
}

/// The "Showing a to b of n entries" bounds.
pub fn showing_range(current: u32, page_size: u32, total_items: u64) -> (u64, u64) {
    let current = u64::from(current.max(1));
    let size = u64::from(page_size);
    let first = ((current - 1) * size + 1).min(total_items);
    let last = (current * size).min(total_items);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u32);

    fn rows(n: u32) -> Vec<Row> {
        (0..n).map(Row).collect()
    }

    #[test]
    fn two_users_fit_on_one_page() {
        let mut state = PageState::<&str>::default();
        let ticket = state.load();
        assert!(state.loading());

        assert!(state.complete(&ticket, Ok(Page::new(vec!["u1", "u2"], 2))));
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.total_items(), 2);
        assert_eq!(state.data(), &["u1", "u2"]);
        assert!(!state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn total_pages_is_ceiling_for_each_size() {
        for size in PageSize::options() {
            for count in [0u64, 1, 4, 5, 9, 10, 11, 49, 50, 51, 137] {
                let mut state = PageState::<Row>::new(size);
                let ticket = state.load();
                let shown = count.min(u64::from(size.get())) as u32;
                state.complete(&ticket, Ok(Page::new(rows(shown), count)));

                let expected = (count as f64 / f64::from(size.get())).ceil() as u32;
                assert_eq!(state.total_pages(), expected, "size {size} count {count}");
            }
        }
    }

    #[test]
    fn search_resets_to_first_page_before_fetch() {
        let mut state = PageState::<Row>::default();
        let ticket = state.handle_page_change(4);
        state.complete(&ticket, Ok(Page::new(rows(10), 100)));
        assert_eq!(state.current_page(), 4);

        let ticket = state.set_search("gold");
        assert_eq!(state.current_page(), 1);
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.search, "gold");
    }

    #[test]
    fn filter_change_resets_to_first_page_before_fetch() {
        let mut state = PageState::<Row>::default();
        let ticket = state.handle_page_change(3);
        state.complete(&ticket, Ok(Page::new(rows(10), 100)));

        let ticket = state.set_filter("role", Some("Manager".into()));
        assert_eq!(state.current_page(), 1);
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.filters.get("role").map(String::as_str), Some("Manager"));

        let ticket = state.handle_page_change(2);
        state.complete(&ticket, Ok(Page::new(rows(10), 100)));
        let ticket = state.set_filters(BTreeMap::new());
        assert_eq!(ticket.query.page, 1);
        assert!(ticket.query.filters.is_empty());
    }

    #[test]
    fn empty_filter_value_removes_key() {
        let mut state = PageState::<Row>::default();
        state.set_filter("is_active", Some("true".into()));
        assert_eq!(state.filter("is_active"), Some("true"));

        let ticket = state.set_filter("is_active", Some(String::new()));
        assert_eq!(state.filter("is_active"), None);
        assert!(!ticket.query.filters.contains_key("is_active"));

        state.set_filter("role", Some("Admin".into()));
        state.set_filter("role", None);
        assert!(state.filters().is_empty());
    }

    #[test]
    fn page_change_is_not_bounds_checked() {
        let mut state = PageState::<Row>::default();
        let ticket = state.load();
        state.complete(&ticket, Ok(Page::new(rows(10), 20)));
        assert_eq!(state.total_pages(), 2);

        let ticket = state.handle_page_change(9);
        assert_eq!(ticket.query.page, 9);
        assert_eq!(state.current_page(), 9);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut state = PageState::<Row>::default();
        let ticket = state.handle_page_change(5);
        state.complete(&ticket, Ok(Page::new(rows(10), 100)));

        let ticket = state.handle_page_size_change(PageSize::try_from(50).unwrap());
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.page_size, 50);
        state.complete(&ticket, Ok(Page::new(rows(50), 100)));
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn refresh_keeps_page_and_filters() {
        let mut state = PageState::<Row>::default();
        state.set_search("ring");
        state.set_filter("role", Some("Employee".into()));
        let ticket = state.handle_page_change(3);
        state.complete(&ticket, Ok(Page::new(rows(10), 40)));

        let ticket = state.refresh();
        assert_eq!(ticket.query.page, 3);
        assert_eq!(ticket.query.search, "ring");
        assert_eq!(ticket.query.filters.len(), 1);
        assert_eq!(state.search(), "ring");
    }

    #[test]
    fn failure_clears_data_but_keeps_counts() {
        let mut state = PageState::<Row>::default();
        let ticket = state.load();
        state.complete(&ticket, Ok(Page::new(rows(10), 35)));

        let ticket = state.handle_page_change(2);
        let applied = state.complete(&ticket, Err(Error::from("Network Error")));
        assert!(applied);
        assert!(state.data().is_empty());
        assert_eq!(state.error(), Some("Network Error"));
        assert_eq!(state.total_items(), 35);
        assert_eq!(state.total_pages(), 4);
        assert!(!state.loading());
    }

    #[test]
    fn failure_without_message_gets_generic_text() {
        let mut state = PageState::<Row>::default();
        let ticket = state.load();
        state.complete(&ticket, Err(Error::default()));
        assert_eq!(state.error(), Some(crate::GENERIC_MESSAGE));
    }

    #[test]
    fn next_fetch_clears_previous_error() {
        let mut state = PageState::<Row>::default();
        let ticket = state.load();
        state.complete(&ticket, Err(Error::from("boom")));
        state.refresh();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = PageState::<Row>::default();
        let slow = state.handle_page_size_change(PageSize::try_from(5).unwrap());
        let fast = state.handle_page_size_change(PageSize::try_from(20).unwrap());

        assert!(state.complete(&fast, Ok(Page::new(rows(20), 60))));
        assert!(!state.complete(&slow, Ok(Page::new(rows(5), 60))));

        assert_eq!(state.data().len(), 20);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.page_size().get(), 20);
    }

    #[test]
    fn loading_stays_on_until_latest_completes() {
        let mut state = PageState::<Row>::default();
        let first = state.load();
        let second = state.refresh();

        state.complete(&first, Ok(Page::new(rows(1), 1)));
        assert!(state.loading());

        state.complete(&second, Ok(Page::new(rows(1), 1)));
        assert!(!state.loading());
    }

    #[test]
    fn query_pairs_include_search_and_filters() {
        let query = PageQuery::new(2, 20)
            .with_filter("role", "Admin")
            .with_filter("is_active", "true");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "20".to_string()),
                ("search".to_string(), String::new()),
                ("is_active".to_string(), "true".to_string()),
                ("role".to_string(), "Admin".to_string()),
            ]
        );
    }

    #[test]
    fn page_size_rejects_unknown_sizes() {
        assert!(PageSize::try_from(7).is_err());
        assert!(PageSize::try_from(0).is_err());
        assert_eq!(PageSize::try_from(20).unwrap().get(), 20);
        assert_eq!(PageSize::default().get(), 10);
    }

    #[test]
    fn page_accepts_paginated_and_bare_bodies() {
        let page: Page<u32> = serde_json::from_str(r#"{"results": [1, 2, 3], "count": 12}"#).unwrap();
        assert_eq!(page, Page::new(vec![1, 2, 3], 12));

        let page: Page<u32> = serde_json::from_str("[4, 5]").unwrap();
        assert_eq!(page, Page::new(vec![4, 5], 2));

        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Page::default());
    }

    #[test]
    fn visible_pages_windows_with_ellipses() {
        use PageLink::{Ellipsis, Page as P};

        assert_eq!(visible_pages(1, 1), vec![P(1)]);
        assert_eq!(visible_pages(1, 3), vec![P(1), P(2), P(3)]);
        assert_eq!(
            visible_pages(1, 10),
            vec![P(1), P(2), P(3), Ellipsis, P(10)]
        );
        assert_eq!(
            visible_pages(6, 12),
            vec![P(1), Ellipsis, P(4), P(5), P(6), P(7), P(8), Ellipsis, P(12)]
        );
        assert_eq!(
            visible_pages(10, 10),
            vec![P(1), Ellipsis, P(8), P(9), P(10)]
        );
    }

    #[test]
    fn visible_pages_survives_out_of_range_current_page() {
        use PageLink::{Ellipsis, Page as P};

        assert_eq!(visible_pages(u32::MAX, 3), vec![P(1), Ellipsis, P(3)]);
        assert_eq!(
            visible_pages(u32::MAX, u32::MAX),
            vec![P(1), Ellipsis, P(u32::MAX - 2), P(u32::MAX - 1), P(u32::MAX)]
        );
        assert_eq!(showing_range(u32::MAX, 50, 10), (10, 10));
    }

    #[test]
    fn showing_range_clamps_to_total() {
        assert_eq!(showing_range(1, 10, 25), (1, 10));
        assert_eq!(showing_range(3, 10, 25), (21, 25));
        assert_eq!(showing_range(1, 10, 0), (0, 0));
    }
}
