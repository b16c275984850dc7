//! Page-number pagination derived from the API's total count.

use std::num::NonZeroU32;

use quill_api_types::ListEnvelope;

/// Number of pages needed to show `count` records, never less than one.
pub fn total_pages(count: u64, page_size: NonZeroU32) -> u32 {
    let size = u64::from(page_size.get());
    let pages = count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Current position within a paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    total_pages: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
        }
    }
}

impl Pager {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page the Next control would request, or `None` on the last page.
    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    pub fn prev(&self) -> Option<u32> {
        self.has_prev().then(|| self.page - 1)
    }

    /// Whether `page` can be requested from the current position.
    pub fn reachable(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn reset(&mut self) {
        self.page = 1;
    }

    pub(crate) fn update_total(&mut self, count: u64, page_size: NonZeroU32) {
        self.total_pages = total_pages(count, page_size);
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: u64,
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        let count = envelope.count();
        Self {
            items: envelope.into_items(),
            count,
        }
    }
}
