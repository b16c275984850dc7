use std::num::NonZeroU32;
use std::sync::Arc;

use metrics::counter;
use quill_api_types::{Post, PostId};
use tracing::info;

use crate::application::api::{ApiError, BlogApi};
use crate::application::forms::PostForm;
use crate::application::gate::ConfirmationGate;
use crate::application::listing::{ListState, Outcome, ScreenStatus};
use crate::application::pagination::Page;
use crate::application::session::SessionStore;

const FETCH_FAILED: &str = "Failed to fetch posts";
const CREATE_FAILED: &str = "Failed to create post";
const UPDATE_FAILED: &str = "Failed to update post";
const DELETE_FAILED: &str = "Failed to delete post";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Delete,
}

/// The signed-in author's posts with the create/edit form.
pub struct MyPostsScreen {
    api: Arc<dyn BlogApi>,
    session: SessionStore,
    pub posts: ListState<Post>,
    pub form: PostForm,
    pub gate: ConfirmationGate<PostAction>,
    pub status: ScreenStatus,
}

impl MyPostsScreen {
    pub fn new(api: Arc<dyn BlogApi>, session: SessionStore, page_size: NonZeroU32) -> Self {
        Self {
            api,
            session,
            posts: ListState::new(page_size),
            form: PostForm::default(),
            gate: ConfirmationGate::default(),
            status: ScreenStatus::default(),
        }
    }

    pub fn starting_at(mut self, page: u32) -> Self {
        self.posts.set_page(page);
        self
    }

    pub async fn load(&mut self) -> Outcome {
        if !self.session.is_signed_in() {
            return Outcome::LoginRequired;
        }
        self.status.begin();
        self.fetch().await
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

    /// Load a listed post into the form for editing.
    pub fn begin_edit(&mut self, id: PostId) -> bool {
        match self.posts.items().iter().find(|post| post.id == id) {
            Some(post) => {
                self.form.begin_edit(post);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form.reset();
    }

    /// Create or update depending on whether the form is editing a post.
    pub async fn submit(&mut self) -> Outcome {
        if !self.session.is_signed_in() {
            return Outcome::LoginRequired;
        }
        self.status.begin();
        if !self.form.validate() {
            return Outcome::Rejected;
        }

        let draft = self.form.draft();
        self.status.loading = true;
        let (result, failure) = match self.form.editing() {
            Some(id) => (
                self.api.update_post(id, &draft).await,
                UPDATE_FAILED,
            ),
            None => (self.api.create_post(&draft).await, CREATE_FAILED),
        };
        self.status.loading = false;

        match result {
            Ok(post) => {
                info!(post_id = post.id, "post saved");
                counter!("quill_mutations_total", "action" => "save_post").increment(1);
                self.form.reset();
                self.fetch().await
            }
            Err(err) => self.status.fail(failure, &err),
        }
    }

    /// Open the confirmation gate for deleting `id`. Nothing is sent yet.
    pub fn request_delete(&mut self, id: PostId) -> Outcome {
        self.gate.open(PostAction::Delete, id);
        Outcome::Pending
    }

    pub fn cancel(&mut self) -> Outcome {
        match self.gate.cancel() {
            Some(_) => Outcome::Cancelled,
            None => Outcome::Idle,
        }
    }

    /// Run the pending destructive action, if there is one.
    pub async fn confirm(&mut self) -> Outcome {
        let Some(pending) = self.gate.confirm() else {
            return Outcome::Idle;
        };
        if !self.session.is_signed_in() {
            return Outcome::LoginRequired;
        }
        self.status.begin();
        match pending.action {
            PostAction::Delete => {
                self.status.loading = true;
                let result = self.api.delete_post(pending.target).await;
                self.status.loading = false;
                match result {
                    Ok(()) => {
                        info!(post_id = pending.target, "post deleted");
                        counter!("quill_mutations_total", "action" => "delete_post").increment(1);
                        if self.form.editing() == Some(pending.target) {
                            self.form.reset();
                        }
                        self.refetch().await
                    }
                    Err(err) => self.status.fail(DELETE_FAILED, &err),
                }
            }
        }
    }

    async fn fetch(&mut self) -> Outcome {
        let result = self.request_page().await;
        self.show(result)
    }

    /// Re-fetch after a removal. If the current page emptied out, fall back
    /// toward the first page until the API answers.
    async fn refetch(&mut self) -> Outcome {
        loop {
            let result = self.request_page().await;
            if !self.posts.step_back_if_gone(&result) {
                return self.show(result);
            }
        }
    }

    async fn request_page(&mut self) -> Result<Page<Post>, ApiError> {
        self.status.loading = true;
        let result = self.api.my_posts(self.posts.page()).await.map(Page::from);
        self.status.loading = false;
        result
    }

    fn show(&mut self, result: Result<Page<Post>, ApiError>) -> Outcome {
        if self.posts.settle(result, &mut self.status, FETCH_FAILED) {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }
}
