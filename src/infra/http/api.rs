//! REST implementation of the API traits.

use async_trait::async_trait;
use quill_api_types::{
    Comment, CommentCreateRequest, CommentId, ForgotPasswordRequest, ListEnvelope, LoginRequest,
    LoginResponse, MessageResponse, OtpRequest, OtpVerifyRequest, Post, PostId,
    ProfileUpdateRequest, RegisterRequest, ResetPasswordRequest, User, UserId,
};
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::application::api::{
    ApiError, AuthApi, CommentQuery, CommentsApi, PostDraft, PostQuery, PostsApi, UserQuery,
    UsersApi,
};
use crate::domain::attachments::Attachment;

use super::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: ApiClient,
}

impl HttpApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

fn attachment_part(attachment: &Attachment) -> Result<Part, ApiError> {
    Part::bytes(attachment.data().to_vec())
        .file_name(attachment.file_name().to_string())
        .mime_str(attachment.content_type())
        .map_err(ApiError::from_transport)
}

fn post_form(draft: &PostDraft) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("content", draft.content.clone());
    if let Some(image) = draft.image.as_ref() {
        form = form.part("image", attachment_part(image)?);
    }
    if let Some(file) = draft.file.as_ref() {
        form = form.part("file", attachment_part(file)?);
    }
    Ok(form)
}

#[async_trait]
impl PostsApi for HttpApi {
    async fn list_posts(&self, query: &PostQuery) -> Result<ListEnvelope<Post>, ApiError> {
        let mut params = vec![page_param(query.page)];
        if let Some(search) = query.search.as_ref() {
            params.push(("search", search.clone()));
        }
        if let Some(author) = query.author {
            params.push(("author", author.to_string()));
        }
        self.client.get_json("blog/posts/", &params).await
    }

    async fn my_posts(&self, page: u32) -> Result<ListEnvelope<Post>, ApiError> {
        self.client
            .get_json("blog/posts/my_posts/", &[page_param(page)])
            .await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, ApiError> {
        self.client
            .get_json(&format!("blog/posts/{id}/"), &[])
            .await
    }

    async fn increment_read_count(&self, id: PostId) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("blog/posts/{id}/increment_read_count/"))
            .await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        self.client
            .send_multipart(Method::POST, "blog/posts/", post_form(draft)?)
            .await
    }

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<Post, ApiError> {
        self.client
            .send_multipart(Method::PUT, &format!("blog/posts/{id}/"), post_form(draft)?)
            .await
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        self.client.delete(&format!("blog/posts/{id}/")).await
    }

    async fn like_post(&self, id: PostId) -> Result<MessageResponse, ApiError> {
        self.client
            .send_json(
                Method::POST,
                &format!("blog/posts/{id}/like/"),
                &serde_json::json!({}),
            )
            .await
    }
}

#[async_trait]
impl CommentsApi for HttpApi {
    async fn list_comments(
        &self,
        query: &CommentQuery,
    ) -> Result<ListEnvelope<Comment>, ApiError> {
        let mut params = vec![page_param(query.page)];
        if let Some(post) = query.post {
            params.push(("post", post.to_string()));
        }
        self.client.get_json("blog/comments/", &params).await
    }

    async fn create_comment(&self, post: PostId, content: &str) -> Result<Comment, ApiError> {
        let body = CommentCreateRequest {
            post,
            content: content.trim().to_string(),
        };
        self.client
            .send_json(Method::POST, "blog/comments/", &body)
            .await
    }

    async fn approve_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("blog/comments/{id}/approve/"))
            .await
    }

    async fn block_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("blog/comments/{id}/block/"))
            .await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.client.delete(&format!("blog/comments/{id}/")).await
    }
}

#[async_trait]
impl UsersApi for HttpApi {
    async fn list_users(&self, query: &UserQuery) -> Result<ListEnvelope<User>, ApiError> {
        let mut params = vec![page_param(query.page)];
        if let Some(search) = query.search.as_ref() {
            params.push(("search", search.clone()));
        }
        self.client.get_json("blog/users/", &params).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.client.delete(&format!("blog/users/{id}/")).await
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/register/", request)
            .await
    }

    async fn request_otp(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = OtpRequest {
            email: email.to_string(),
        };
        self.client
            .send_json(Method::POST, "auth/otp/request/", &body)
            .await
    }

    async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<MessageResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/otp/verify/", request)
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/login/", request)
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_unit("auth/logout/").await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.client.get_json("auth/profile/", &[]).await
    }

    async fn update_profile(&self, request: &ProfileUpdateRequest) -> Result<User, ApiError> {
        self.client
            .send_json(Method::PUT, "auth/profile/", request)
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.client
            .send_json(Method::POST, "auth/forgot-password/", &body)
            .await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/forgot-password/reset/", request)
            .await
    }
}
