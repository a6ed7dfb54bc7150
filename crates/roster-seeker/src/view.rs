//! Pagination and the browse pipeline.
//!
//! [`paginate`] slices a fixed-size window out of an already filtered and
//! sorted sequence. [`BrowseState`] is the value the view layer keeps between
//! events (filter, sort, page number, page size); [`BrowseState::view`] runs
//! the whole pipeline against a raw collection:
//!
//! ```text
//! raw ──filter──▶ matched ──sort──▶ ordered ──paginate──▶ page
//!                                      │
//!                                      └──────────────▶ export
//! ```

use crate::error::{Result, SeekerError};
use crate::filter::{FilterSpec, SearchScope};
use crate::ordering::SortSpec;
use crate::value::Value;

/// Page size used by the dashboard tables.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One window of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The records on this page.
    pub items: Vec<T>,
    /// The 1-based page number actually served, after clamping.
    pub number: usize,
    /// Total number of pages; at least 1, even for an empty sequence.
    pub total_pages: usize,
    pub page_size: usize,
    /// Length of the whole sequence that was paginated.
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// 1-based positions of the first and last record on the page, if any.
    pub fn span(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.number - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// Number of pages needed for `len` records; never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> Result<usize> {
    if page_size == 0 {
        return Err(SeekerError::InvalidPageSize);
    }
    Ok(len.div_ceil(page_size).max(1))
}

/// Takes page `page` (1-based) of `items`.
///
/// Out-of-range page numbers are clamped: `0` serves page 1 and anything past
/// the end serves the last page. Only a zero `page_size` is an error.
///
/// ```
/// use roster_seeker::paginate;
///
/// let records: Vec<u32> = (1..=45).collect();
/// let page = paginate(records, 5, 20).unwrap();
/// assert_eq!(page.number, 3);
/// assert_eq!(page.total_pages, 3);
/// assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Result<Page<T>> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size)?;
    let number = page.clamp(1, total_pages);
    if number != page {
        tracing::debug!(requested = page, served = number, total_pages, "clamped page number");
    }

    let start = (number - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Ok(Page {
        items,
        number,
        total_pages,
        page_size,
        total_items,
    })
}

/// Filter, sort and page state of one record table.
///
/// Every update returns a new state; the pipeline never mutates it.
///
/// ```
/// use roster_seeker::{BrowseState, FilterSpec, SearchScope, Value};
///
/// fn accessor<'a>(name: &'a String, _field: &str) -> Value<'a> {
///     Value::String(name)
/// }
///
/// let names: Vec<String> = ["Cid", "Ann", "Bob", "Abe"].iter().map(|s| s.to_string()).collect();
/// let scope = SearchScope::new(["name"]);
///
/// let state = BrowseState::new(2)
///     .unwrap()
///     .with_filter(FilterSpec::new().search("b"))
///     .toggle_sort("name");
///
/// let view = state.view(&names, &scope, accessor).unwrap();
/// assert_eq!(view.page.items, [&names[3], &names[2]]);
/// assert_eq!(view.summary(), "Showing 2 of 4 records");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    filter: FilterSpec,
    sort: SortSpec,
    page: usize,
    page_size: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        BrowseState {
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowseState {
    /// A fresh state showing page 1 with `page_size` records per page.
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(SeekerError::InvalidPageSize);
        }
        Ok(BrowseState {
            page_size,
            ..BrowseState::default()
        })
    }

    /// Replaces the filter. The page goes back to 1.
    pub fn with_filter(self, filter: FilterSpec) -> Self {
        BrowseState {
            filter,
            page: 1,
            ..self
        }
    }

    /// Applies a header click on `field` (see [`SortSpec::toggle`]).
    pub fn toggle_sort(self, field: &str) -> Self {
        let sort = self.sort.toggle(field);
        BrowseState { sort, ..self }
    }

    pub fn with_sort(self, sort: SortSpec) -> Self {
        BrowseState { sort, ..self }
    }

    /// Requests a page. It is clamped when the view is computed.
    pub fn with_page(self, page: usize) -> Self {
        BrowseState { page, ..self }
    }

    pub fn next_page(self) -> Self {
        let page = self.page.saturating_add(1);
        self.with_page(page)
    }

    pub fn prev_page(self) -> Self {
        let page = self.page.saturating_sub(1).max(1);
        self.with_page(page)
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The requested page number, before clamping.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Filtered and sorted records, unpaginated. This is what an export sees.
    pub fn visible<'a, T, F>(&self, items: &'a [T], scope: &SearchScope, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let matched = self.filter.apply(items, scope, &accessor);
        self.sort.sort(matched, &accessor)
    }

    /// Runs filter, sort and pagination against `items`.
    pub fn view<'a, T, F>(
        &self,
        items: &'a [T],
        scope: &SearchScope,
        accessor: F,
    ) -> Result<BrowseView<'a, T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let ordered = self.visible(items, scope, accessor);
        let matched = ordered.len();
        let page = paginate(ordered, self.page, self.page_size)?;

        Ok(BrowseView {
            page,
            matched,
            total: items.len(),
            filtered: self.filter.is_active(),
        })
    }

    /// This state with its page number replaced by the one `view` served.
    pub fn settled<T>(self, view: &BrowseView<'_, T>) -> Self {
        self.with_page(view.page.number)
    }
}

/// Result of running the pipeline once.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseView<'a, T> {
    pub page: Page<&'a T>,
    /// Records left after filtering.
    pub matched: usize,
    /// Records in the raw collection.
    pub total: usize,
    /// Whether any filter criterion was active.
    pub filtered: bool,
}

impl<T> BrowseView<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    /// "Showing X of Y records".
    pub fn summary(&self) -> String {
        format!("Showing {} of {} records", self.matched, self.total)
    }

    /// Text for an empty table, distinguishing "nothing matched" from
    /// "nothing there".
    pub fn empty_message(&self) -> &'static str {
        if self.filtered && self.total > 0 {
            "No records match your filters"
        } else {
            "No records found"
        }
    }
}
