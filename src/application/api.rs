//! Traits describing the remote blogging API the screens talk to.

use async_trait::async_trait;
use quill_api_types::{
    Comment, CommentId, ListEnvelope, LoginRequest, LoginResponse, MessageResponse,
    OtpVerifyRequest, Post, PostId, ProfileUpdateRequest, RegisterRequest, ResetPasswordRequest,
    User, UserId,
};
use thiserror::Error;

use crate::domain::attachments::Attachment;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("authentication required or rejected")]
    Unauthorized,
    #[error("resource not found")]
    NotFound,
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn from_transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => Self::Status {
                status,
                body: body.into(),
            },
        }
    }
}

/// Filter for the public feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: Option<String>,
    pub author: Option<UserId>,
    pub page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentQuery {
    pub post: Option<PostId>,
    pub page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub page: u32,
}

/// Fields sent when creating or replacing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image: Option<Attachment>,
    pub file: Option<Attachment>,
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self, query: &PostQuery) -> Result<ListEnvelope<Post>, ApiError>;

    async fn my_posts(&self, page: u32) -> Result<ListEnvelope<Post>, ApiError>;

    async fn get_post(&self, id: PostId) -> Result<Post, ApiError>;

    async fn increment_read_count(&self, id: PostId) -> Result<(), ApiError>;

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError>;

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<Post, ApiError>;

    async fn delete_post(&self, id: PostId) -> Result<(), ApiError>;

    /// Toggles the viewer's like; the API decides the direction.
    async fn like_post(&self, id: PostId) -> Result<MessageResponse, ApiError>;
}

#[async_trait]
pub trait CommentsApi: Send + Sync {
    async fn list_comments(&self, query: &CommentQuery)
    -> Result<ListEnvelope<Comment>, ApiError>;

    async fn create_comment(&self, post: PostId, content: &str) -> Result<Comment, ApiError>;

    async fn approve_comment(&self, id: CommentId) -> Result<(), ApiError>;

    async fn block_comment(&self, id: CommentId) -> Result<(), ApiError>;

    async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list_users(&self, query: &UserQuery) -> Result<ListEnvelope<User>, ApiError>;

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError>;

    async fn request_otp(&self, email: &str) -> Result<MessageResponse, ApiError>;

    async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<MessageResponse, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn profile(&self) -> Result<User, ApiError>;

    async fn update_profile(&self, request: &ProfileUpdateRequest) -> Result<User, ApiError>;

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError>;

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError>;
}

/// Everything the blog screens need from the API.
pub trait BlogApi: PostsApi + CommentsApi + UsersApi {}

impl<T> BlogApi for T where T: PostsApi + CommentsApi + UsersApi {}
