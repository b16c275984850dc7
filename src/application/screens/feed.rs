use std::num::NonZeroU32;
use std::sync::Arc;

use quill_api_types::{Post, UserId};
use tracing::debug;

use crate::application::api::{BlogApi, PostQuery};
use crate::application::listing::{ListState, Outcome, ScreenStatus};
use crate::application::pagination::Page;

const FETCH_FAILED: &str = "Failed to fetch posts";

/// Public post feed with search and author filters.
pub struct FeedScreen {
    api: Arc<dyn BlogApi>,
    search: Option<String>,
    author: Option<UserId>,
    pub posts: ListState<Post>,
    pub status: ScreenStatus,
}

impl FeedScreen {
    pub fn new(api: Arc<dyn BlogApi>, page_size: NonZeroU32) -> Self {
        Self {
            api,
            search: None,
            author: None,
            posts: ListState::new(page_size),
            status: ScreenStatus::default(),
        }
    }

    /// Start on `page` instead of the first one.
    pub fn starting_at(mut self, page: u32) -> Self {
        self.posts.set_page(page);
        self
    }

    /// Start with filters already applied.
    pub fn filtered(mut self, search: Option<String>, author: Option<UserId>) -> Self {
        self.search = search.filter(|value| !value.trim().is_empty());
        self.author = author;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn author(&self) -> Option<UserId> {
        self.author
    }

    pub async fn load(&mut self) -> Outcome {
        self.status.begin();
        self.fetch().await
    }

    /// Changing a filter always goes back to the first page.
    pub async fn set_search(&mut self, term: Option<String>) -> Outcome {
        self.search = term.filter(|value| !value.trim().is_empty());
        self.posts.reset_page();
        self.load().await
    }

    pub async fn set_author(&mut self, author: Option<UserId>) -> Outcome {
        self.author = author;
        self.posts.reset_page();
        self.load().await
    }

    pub async fn next_page(&mut self) -> Outcome {
        let next = self.posts.pager().next();
        self.go(next).await
    }

    pub async fn prev_page(&mut self) -> Outcome {
        let prev = self.posts.pager().prev();
        self.go(prev).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Outcome {
        self.go(Some(page)).await
    }

    async fn go(&mut self, page: Option<u32>) -> Outcome {
        if !self.posts.move_to(page) {
            return Outcome::Idle;
        }
        self.load().await
    }

    async fn fetch(&mut self) -> Outcome {
        let query = PostQuery {
            search: self.search.clone(),
            author: self.author,
            page: self.posts.page(),
        };
        debug!(?query, "fetching feed");
        self.status.loading = true;
        let result = self.api.list_posts(&query).await.map(Page::from);
        self.status.loading = false;
        if self.posts.settle(result, &mut self.status, FETCH_FAILED) {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }
}
