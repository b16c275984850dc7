use std::num::NonZeroU32;
use std::sync::Arc;

use metrics::counter;
use quill_api_types::{ApprovalStatus, Comment, Post, PostId};
use tracing::{info, warn};

use crate::application::api::{BlogApi, CommentQuery};
use crate::application::forms::CommentForm;
use crate::application::listing::{ListState, Outcome, ScreenStatus};
use crate::application::pagination::Page;
use crate::application::session::SessionStore;

const FETCH_FAILED: &str = "Failed to fetch post or comments";
const LIKE_FAILED: &str = "Failed to like/unlike post";
const COMMENT_FAILED: &str = "Failed to submit comment";

/// One post with its comment thread.
pub struct PostDetailScreen {
    api: Arc<dyn BlogApi>,
    session: SessionStore,
    post_id: PostId,
    pub post: Option<Post>,
    pub comments: ListState<Comment>,
    pub comment_form: CommentForm,
    pub status: ScreenStatus,
}

impl PostDetailScreen {
    pub fn new(
        api: Arc<dyn BlogApi>,
        session: SessionStore,
        post_id: PostId,
        page_size: NonZeroU32,
    ) -> Self {
        Self {
            api,
            session,
            post_id,
            post: None,
            comments: ListState::new(page_size),
            comment_form: CommentForm::default(),
            status: ScreenStatus::default(),
        }
    }

    /// Start the comment thread on `page` instead of the first one.
    pub fn starting_at(mut self, page: u32) -> Self {
        self.comments.set_page(page);
        self
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Comments the API reports as approved, in API order.
    pub fn visible_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments
            .items()
            .iter()
            .filter(|comment| comment.approval() == ApprovalStatus::Approved)
    }

    /// Count the view, then load the post and the first page of comments.
    pub async fn open(&mut self) -> Outcome {
        self.status.begin();
        self.status.loading = true;

        if self.session.is_signed_in() {
            if let Err(err) = self.api.increment_read_count(self.post_id).await {
                warn!(post_id = self.post_id, error = %err, "read count not recorded");
            }
        }

        let post = self.api.get_post(self.post_id).await;
        self.status.loading = false;
        match post {
            Ok(post) => self.post = Some(post),
            Err(err) => {
                self.post = None;
                return self.status.fail(FETCH_FAILED, &err);
            }
        }
        self.fetch_comments().await
    }

    pub async fn like(&mut self) -> Outcome {
        if !self.session.is_signed_in() {
            return Outcome::LoginRequired;
        }
        self.status.begin();
        self.status.loading = true;
        let result = self.api.like_post(self.post_id).await;
        self.status.loading = false;
        if let Err(err) = result {
            return self.status.fail(LIKE_FAILED, &err);
        }
        counter!("quill_mutations_total", "action" => "like_post").increment(1);
        self.fetch_post(LIKE_FAILED).await
    }

    pub async fn submit_comment(&mut self) -> Outcome {
        if !self.session.is_signed_in() {
            return Outcome::LoginRequired;
        }
        self.status.begin();
        if !self.comment_form.validate() {
            return Outcome::Rejected;
        }
        self.status.loading = true;
        let result = self
            .api
            .create_comment(self.post_id, &self.comment_form.content)
            .await;
        self.status.loading = false;
        match result {
            Ok(comment) => {
                info!(comment_id = comment.id, post_id = self.post_id, "comment submitted");
                counter!("quill_mutations_total", "action" => "create_comment").increment(1);
                self.comment_form.reset();
                self.fetch_comments().await
            }
            Err(err) => self.status.fail(COMMENT_FAILED, &err),
        }
    }

    /// Reload the current comment page without touching the post.
    pub async fn load_comments(&mut self) -> Outcome {
        self.status.begin();
        self.fetch_comments().await
    }

    pub async fn next_comments(&mut self) -> Outcome {
        let next = self.comments.pager().next();
        self.go(next).await
    }

    pub async fn prev_comments(&mut self) -> Outcome {
        let prev = self.comments.pager().prev();
        self.go(prev).await
    }

    async fn go(&mut self, page: Option<u32>) -> Outcome {
        if !self.comments.move_to(page) {
            return Outcome::Idle;
        }
        self.load_comments().await
    }

    async fn fetch_post(&mut self, failure: &'static str) -> Outcome {
        self.status.loading = true;
        let result = self.api.get_post(self.post_id).await;
        self.status.loading = false;
        match result {
            Ok(post) => {
                self.post = Some(post);
                Outcome::Applied
            }
            Err(err) => self.status.fail(failure, &err),
        }
    }

    async fn fetch_comments(&mut self) -> Outcome {
        let query = CommentQuery {
            post: Some(self.post_id),
            page: self.comments.page(),
        };
        self.status.loading = true;
        let result = self.api.list_comments(&query).await.map(Page::from);
        self.status.loading = false;
        if self.comments.settle(result, &mut self.status, FETCH_FAILED) {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }
}
