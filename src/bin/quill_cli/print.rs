use quill::application::forms::preview;
use quill::application::listing::ListState;
use quill::application::pagination::Pager;
use quill_api_types::{Post, UserId};
use serde::Serialize;

use crate::client::CliError;

const PREVIEW_CHARS: usize = 150;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidInput(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// One page of a list together with where it sits.
#[derive(Debug, Serialize)]
pub struct PageView<T> {
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub items: Vec<T>,
}

impl<T> PageView<T> {
    pub fn new(pager: Pager, items: Vec<T>) -> Self {
        Self {
            page: pager.page(),
            total_pages: pager.total_pages(),
            has_next: pager.has_next(),
            has_prev: pager.has_prev(),
            items,
        }
    }
}

pub fn page_of<T: Clone>(list: &ListState<T>) -> PageView<T> {
    PageView::new(list.pager(), list.items().to_vec())
}

#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub author_id: UserId,
    pub author: String,
    pub preview: String,
    pub read_count: u64,
    pub likes_count: u64,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author_id: post.author.id,
            author: post
                .author
                .username
                .clone()
                .unwrap_or_else(|| post.author.email.clone()),
            preview: preview(&post.content, PREVIEW_CHARS),
            read_count: post.read_count,
            likes_count: post.likes_count,
        }
    }
}

pub fn post_page(list: &ListState<Post>) -> PageView<PostSummary> {
    PageView::new(list.pager(), list.items().iter().map(PostSummary::from).collect())
}
