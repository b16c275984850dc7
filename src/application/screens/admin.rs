use std::num::NonZeroU32;
use std::sync::Arc;

use metrics::counter;
use quill_api_types::{Comment, CommentId, User};
use tracing::info;

use crate::application::api::{ApiError, BlogApi, CommentQuery, UserQuery};
use crate::application::gate::ConfirmationGate;
use crate::application::listing::{ListState, Outcome, ScreenStatus};
use crate::application::pagination::Page;
use crate::application::session::SessionStore;

const COMMENTS_FETCH_FAILED: &str = "Failed to fetch comments";
const USERS_FETCH_FAILED: &str = "Failed to fetch users";
const APPROVE_FAILED: &str = "Failed to approve comment";
const BLOCK_FAILED: &str = "Failed to block comment";
const DELETE_COMMENT_FAILED: &str = "Failed to delete comment";
const DELETE_USER_FAILED: &str = "Failed to delete user";

/// Destructive admin actions that go through the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    BlockComment,
    DeleteComment,
    DeleteUser,
}

impl AdminAction {
    pub fn describe(self) -> &'static str {
        match self {
            AdminAction::BlockComment => "block comment",
            AdminAction::DeleteComment => "delete comment",
            AdminAction::DeleteUser => "delete user",
        }
    }
}

/// Moderation queue and user management for staff.
pub struct AdminDashboard {
    api: Arc<dyn BlogApi>,
    session: SessionStore,
    user_search: Option<String>,
    pub comments: ListState<Comment>,
    pub users: ListState<User>,
    pub gate: ConfirmationGate<AdminAction>,
    pub status: ScreenStatus,
}

impl AdminDashboard {
    pub fn new(api: Arc<dyn BlogApi>, session: SessionStore, page_size: NonZeroU32) -> Self {
        Self {
            api,
            session,
            user_search: None,
            comments: ListState::new(page_size),
            users: ListState::new(page_size),
            gate: ConfirmationGate::default(),
            status: ScreenStatus::default(),
        }
    }

    pub fn starting_at(mut self, comments_page: u32, users_page: u32) -> Self {
        self.comments.set_page(comments_page);
        self.users.set_page(users_page);
        self
    }

    /// Start with a user search term already applied.
    pub fn searching(mut self, term: Option<String>) -> Self {
        self.user_search = term.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn user_search(&self) -> Option<&str> {
        self.user_search.as_deref()
    }

    fn access(&self) -> Option<Outcome> {
        if !self.session.is_signed_in() {
            Some(Outcome::LoginRequired)
        } else if !self.session.is_staff() {
            Some(Outcome::Forbidden)
        } else {
            None
        }
    }

    /// Load both lists. A failure in either leaves the screen error set.
    pub async fn load(&mut self) -> Outcome {
        if let Some(denied) = self.access() {
            return denied;
        }
        self.status.begin();
        let comments = self.fetch_comments().await;
        let users = self.fetch_users().await;
        if comments == Outcome::Applied && users == Outcome::Applied {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }

    pub async fn load_comments(&mut self) -> Outcome {
        if let Some(denied) = self.access() {
            return denied;
        }
        self.status.begin();
        self.fetch_comments().await
    }

    pub async fn load_users(&mut self) -> Outcome {
        if let Some(denied) = self.access() {
            return denied;
        }
        self.status.begin();
        self.fetch_users().await
    }

    pub async fn search_users(&mut self, term: Option<String>) -> Outcome {
        self.user_search = term.filter(|value| !value.trim().is_empty());
        self.users.reset_page();
        self.load_users().await
    }

    pub async fn next_comments(&mut self) -> Outcome {
        if !self.comments.move_to(self.comments.pager().next()) {
            return Outcome::Idle;
        }
        self.load_comments().await
    }

    pub async fn prev_comments(&mut self) -> Outcome {
        if !self.comments.move_to(self.comments.pager().prev()) {
            return Outcome::Idle;
        }
        self.load_comments().await
    }

    pub async fn next_users(&mut self) -> Outcome {
        if !self.users.move_to(self.users.pager().next()) {
            return Outcome::Idle;
        }
        self.load_users().await
    }

    pub async fn prev_users(&mut self) -> Outcome {
        if !self.users.move_to(self.users.pager().prev()) {
            return Outcome::Idle;
        }
        self.load_users().await
    }

    /// Approval is not destructive and runs immediately.
    pub async fn approve(&mut self, id: CommentId) -> Outcome {
        if let Some(denied) = self.access() {
            return denied;
        }
        self.status.begin();
        self.status.loading = true;
        let result = self.api.approve_comment(id).await;
        self.status.loading = false;
        match result {
            Ok(()) => {
                info!(comment_id = id, "comment approved");
                counter!("quill_mutations_total", "action" => "approve_comment").increment(1);
                self.fetch_comments().await
            }
            Err(err) => self.status.fail(APPROVE_FAILED, &err),
        }
    }

    pub fn request(&mut self, action: AdminAction, target: i64) -> Outcome {
        if let Some(denied) = self.access() {
            return denied;
        }
        self.gate.open(action, target);
        Outcome::Pending
    }

    pub fn cancel(&mut self) -> Outcome {
        match self.gate.cancel() {
            Some(_) => Outcome::Cancelled,
            None => Outcome::Idle,
        }
    }

    pub async fn confirm(&mut self) -> Outcome {
        let Some(pending) = self.gate.confirm() else {
            return Outcome::Idle;
        };
        if let Some(denied) = self.access() {
            return denied;
        }
        self.status.begin();
        let target = pending.target;
        self.status.loading = true;
        let (result, failure) = match pending.action {
            AdminAction::BlockComment => (self.api.block_comment(target).await, BLOCK_FAILED),
            AdminAction::DeleteComment => (
                self.api.delete_comment(target).await,
                DELETE_COMMENT_FAILED,
            ),
            AdminAction::DeleteUser => (self.api.delete_user(target).await, DELETE_USER_FAILED),
        };
        self.status.loading = false;

        if let Err(err) = result {
            return self.status.fail(failure, &err);
        }
        info!(
            target_id = target,
            action = pending.action.describe(),
            "admin action confirmed"
        );
        counter!("quill_mutations_total", "action" => pending.action.describe()).increment(1);
        match pending.action {
            AdminAction::BlockComment => self.fetch_comments().await,
            AdminAction::DeleteComment => self.refetch_comments().await,
            AdminAction::DeleteUser => self.refetch_users().await,
        }
    }

    async fn fetch_comments(&mut self) -> Outcome {
        let result = self.request_comments().await;
        self.show_comments(result)
    }

    async fn fetch_users(&mut self) -> Outcome {
        let result = self.request_users().await;
        self.show_users(result)
    }

    /// Re-fetch after a removal, stepping back while the current page is gone.
    async fn refetch_comments(&mut self) -> Outcome {
        loop {
            let result = self.request_comments().await;
            if !self.comments.step_back_if_gone(&result) {
                return self.show_comments(result);
            }
        }
    }

    async fn refetch_users(&mut self) -> Outcome {
        loop {
            let result = self.request_users().await;
            if !self.users.step_back_if_gone(&result) {
                return self.show_users(result);
            }
        }
    }

    async fn request_comments(&mut self) -> Result<Page<Comment>, ApiError> {
        let query = CommentQuery {
            post: None,
            page: self.comments.page(),
        };
        self.status.loading = true;
        let result = self.api.list_comments(&query).await.map(Page::from);
        self.status.loading = false;
        result
    }

    async fn request_users(&mut self) -> Result<Page<User>, ApiError> {
        let query = UserQuery {
            search: self.user_search.clone(),
            page: self.users.page(),
        };
        self.status.loading = true;
        let result = self.api.list_users(&query).await.map(Page::from);
        self.status.loading = false;
        result
    }

    fn show_comments(&mut self, result: Result<Page<Comment>, ApiError>) -> Outcome {
        if self
            .comments
            .settle(result, &mut self.status, COMMENTS_FETCH_FAILED)
        {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }

    fn show_users(&mut self, result: Result<Page<User>, ApiError>) -> Outcome {
        if self
            .users
            .settle(result, &mut self.status, USERS_FETCH_FAILED)
        {
            Outcome::Applied
        } else {
            Outcome::Failed
        }
    }
}
