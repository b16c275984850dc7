//! State shared by every list screen: the fetched page, its position, and the
//! screen's loading/error flags.

use std::num::NonZeroU32;

use tracing::warn;

use crate::application::api::ApiError;
use crate::application::pagination::{Page, Pager};

/// Result of a screen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action went through and the affected list now mirrors the API.
    Applied,
    /// Client-side validation failed; nothing was sent.
    Rejected,
    /// The API call failed; the screen error is set.
    Failed,
    LoginRequired,
    Forbidden,
    /// A destructive action is waiting for confirmation.
    Pending,
    Cancelled,
    /// Nothing to do, e.g. Next on the last page.
    Idle,
}

/// Loading flag and screen-level error string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenStatus {
    pub loading: bool,
    pub error: Option<&'static str>,
}

impl ScreenStatus {
    /// Start of a user action: previous error is dropped.
    pub fn begin(&mut self) {
        self.error = None;
    }

    pub fn fail(&mut self, message: &'static str, err: &ApiError) -> Outcome {
        warn!(error = %err, message, "screen action failed");
        self.error = Some(message);
        Outcome::Failed
    }
}

/// One fetched page of records plus its pager.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    pager: Pager,
    page_size: NonZeroU32,
}

impl<T> ListState<T> {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            items: Vec::new(),
            pager: Pager::default(),
            page_size,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn page(&self) -> u32 {
        self.pager.page()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.pager.set_page(page);
    }

    pub(crate) fn reset_page(&mut self) {
        self.pager.reset();
    }

    /// Move to `page` when the pager can reach it.
    pub(crate) fn move_to(&mut self, page: Option<u32>) -> bool {
        match page {
            Some(page) if self.pager.reachable(page) => {
                self.pager.set_page(page);
                true
            }
            _ => false,
        }
    }

    /// A mutation can empty the page being shown. When the API no longer has
    /// the current page, step back one and report that a retry is due.
    pub(crate) fn step_back_if_gone(&mut self, result: &Result<Page<T>, ApiError>) -> bool {
        match result {
            Err(ApiError::NotFound) if self.page() > 1 => {
                let previous = self.page() - 1;
                self.pager.set_page(previous);
                true
            }
            _ => false,
        }
    }

    /// Replace the list with the API's answer. On failure the list is cleared
    /// and the static `failure` message lands on `status`.
    pub(crate) fn settle(
        &mut self,
        result: Result<Page<T>, ApiError>,
        status: &mut ScreenStatus,
        failure: &'static str,
    ) -> bool {
        match result {
            Ok(page) => {
                self.pager.update_total(page.count, self.page_size);
                self.items = page.items;
                true
            }
            Err(err) => {
                self.items.clear();
                status.fail(failure, &err);
                false
            }
        }
    }
}
