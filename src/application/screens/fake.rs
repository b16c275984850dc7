//! In-memory stand-in for the blogging API used by screen tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use quill_api_types::{
    AuthorRef, Comment, CommentId, ListEnvelope, MessageResponse, Paginated, Post, PostId, User,
    UserId,
};

use crate::application::api::{
    ApiError, CommentQuery, CommentsApi, PostDraft, PostQuery, PostsApi, UserQuery, UsersApi,
};

pub const PAGE_SIZE: usize = 2;

#[derive(Default)]
struct Store {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    users: Vec<User>,
    liked: HashSet<PostId>,
    next_id: i64,
}

#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
}

pub fn author(id: UserId) -> AuthorRef {
    AuthorRef {
        id,
        email: format!("user{id}@blog.io"),
        username: None,
    }
}

pub fn user(id: UserId, is_staff: bool) -> User {
    User {
        id,
        email: format!("user{id}@blog.io"),
        username: Some(format!("user{id:03}")),
        first_name: None,
        last_name: None,
        is_staff,
    }
}

fn page_of<T: Clone>(items: &[T], page: u32) -> Result<ListEnvelope<T>, ApiError> {
    let page = page.max(1) as usize;
    let start = (page - 1) * PAGE_SIZE;
    if start > 0 && start >= items.len() {
        return Err(ApiError::NotFound);
    }
    let results = items.iter().skip(start).take(PAGE_SIZE).cloned().collect();
    Ok(ListEnvelope::Page(Paginated {
        count: items.len() as u64,
        next: None,
        previous: None,
        results,
    }))
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.store.lock().expect("store lock").next_id = 100;
        api
    }

    pub fn with_post(self, id: PostId, title: &str, author_id: UserId) -> Self {
        self.store.lock().expect("store lock").posts.push(Post {
            id,
            title: title.to_string(),
            content: format!("{title} body"),
            author: author(author_id),
            image: None,
            file: None,
            read_count: 0,
            likes_count: 0,
            is_liked: false,
            created_at: None,
            updated_at: None,
        });
        self
    }

    pub fn with_comment(self, id: CommentId, post: PostId, approved: bool) -> Self {
        self.store.lock().expect("store lock").comments.push(Comment {
            id,
            post,
            user: author(9),
            content: format!("comment {id}"),
            is_approved: approved,
            status: None,
            created_at: None,
        });
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.store.lock().expect("store lock").users.push(user);
        self
    }

    /// Make every call to `method` fail with a server error.
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().expect("failing lock").insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().expect("failing lock").remove(method);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(':').next() == Some(method))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("calls lock").clear();
    }

    pub fn posts(&self) -> Vec<Post> {
        self.store.lock().expect("store lock").posts.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.store.lock().expect("store lock").comments.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.store.lock().expect("store lock").users.clone()
    }

    /// Mutate the backing store behind the client's back.
    pub fn remote_edit(&self, edit: impl FnOnce(&mut Vec<Post>)) {
        edit(&mut self.store.lock().expect("store lock").posts);
    }

    fn enter(&self, method: &'static str, detail: impl std::fmt::Display) -> Result<(), ApiError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{method}:{detail}"));
        if self.failing.lock().expect("failing lock").contains(method) {
            return Err(ApiError::from_status(500, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostsApi for FakeApi {
    async fn list_posts(&self, query: &PostQuery) -> Result<ListEnvelope<Post>, ApiError> {
        self.enter("list_posts", query.page)?;
        let store = self.store.lock().expect("store lock");
        let matching: Vec<Post> = store
            .posts
            .iter()
            .filter(|post| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| post.title.contains(term))
            })
            .filter(|post| query.author.is_none_or(|id| post.author.id == id))
            .cloned()
            .collect();
        page_of(&matching, query.page)
    }

    async fn my_posts(&self, page: u32) -> Result<ListEnvelope<Post>, ApiError> {
        self.enter("my_posts", page)?;
        let store = self.store.lock().expect("store lock");
        let mine: Vec<Post> = store
            .posts
            .iter()
            .filter(|post| post.author.id == 1)
            .cloned()
            .collect();
        page_of(&mine, page)
    }

    async fn get_post(&self, id: PostId) -> Result<Post, ApiError> {
        self.enter("get_post", id)?;
        let store = self.store.lock().expect("store lock");
        let mut post = store
            .posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)?;
        post.is_liked = store.liked.contains(&id);
        Ok(post)
    }

    async fn increment_read_count(&self, id: PostId) -> Result<(), ApiError> {
        self.enter("increment_read_count", id)?;
        let mut store = self.store.lock().expect("store lock");
        let post = store
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(ApiError::NotFound)?;
        post.read_count += 1;
        Ok(())
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        self.enter("create_post", &draft.title)?;
        let mut store = self.store.lock().expect("store lock");
        store.next_id += 1;
        let post = Post {
            id: store.next_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            author: author(1),
            image: draft
                .image
                .as_ref()
                .map(|image| format!("/media/{}", image.file_name())),
            file: draft
                .file
                .as_ref()
                .map(|file| format!("/media/{}", file.file_name())),
            read_count: 0,
            likes_count: 0,
            is_liked: false,
            created_at: None,
            updated_at: None,
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: PostId, draft: &PostDraft) -> Result<Post, ApiError> {
        self.enter("update_post", id)?;
        let mut store = self.store.lock().expect("store lock");
        let post = store
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(ApiError::NotFound)?;
        post.title = draft.title.clone();
        post.content = draft.content.clone();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        self.enter("delete_post", id)?;
        let mut store = self.store.lock().expect("store lock");
        let before = store.posts.len();
        store.posts.retain(|post| post.id != id);
        if store.posts.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn like_post(&self, id: PostId) -> Result<MessageResponse, ApiError> {
        self.enter("like_post", id)?;
        let mut store = self.store.lock().expect("store lock");
        let liked = if store.liked.remove(&id) {
            false
        } else {
            store.liked.insert(id);
            true
        };
        let post = store
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(ApiError::NotFound)?;
        if liked {
            post.likes_count += 1;
        } else {
            post.likes_count = post.likes_count.saturating_sub(1);
        }
        Ok(MessageResponse {
            message: Some(if liked { "Post Liked" } else { "Post Unliked" }.to_string()),
            user: None,
        })
    }
}

#[async_trait]
impl CommentsApi for FakeApi {
    async fn list_comments(
        &self,
        query: &CommentQuery,
    ) -> Result<ListEnvelope<Comment>, ApiError> {
        self.enter("list_comments", query.page)?;
        let store = self.store.lock().expect("store lock");
        let matching: Vec<Comment> = store
            .comments
            .iter()
            .filter(|comment| query.post.is_none_or(|post| comment.post == post))
            .cloned()
            .collect();
        page_of(&matching, query.page)
    }

    async fn create_comment(&self, post: PostId, content: &str) -> Result<Comment, ApiError> {
        self.enter("create_comment", post)?;
        let mut store = self.store.lock().expect("store lock");
        store.next_id += 1;
        let comment = Comment {
            id: store.next_id,
            post,
            user: author(1),
            content: content.to_string(),
            is_approved: false,
            status: None,
            created_at: None,
        };
        store.comments.push(comment.clone());
        Ok(comment)
    }

    async fn approve_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.enter("approve_comment", id)?;
        let mut store = self.store.lock().expect("store lock");
        let comment = store
            .comments
            .iter_mut()
            .find(|comment| comment.id == id)
            .ok_or(ApiError::NotFound)?;
        comment.is_approved = true;
        Ok(())
    }

    async fn block_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.enter("block_comment", id)?;
        let mut store = self.store.lock().expect("store lock");
        let comment = store
            .comments
            .iter_mut()
            .find(|comment| comment.id == id)
            .ok_or(ApiError::NotFound)?;
        comment.is_approved = false;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.enter("delete_comment", id)?;
        let mut store = self.store.lock().expect("store lock");
        store.comments.retain(|comment| comment.id != id);
        Ok(())
    }
}

#[async_trait]
impl UsersApi for FakeApi {
    async fn list_users(&self, query: &UserQuery) -> Result<ListEnvelope<User>, ApiError> {
        self.enter("list_users", query.page)?;
        let store = self.store.lock().expect("store lock");
        let matching: Vec<User> = store
            .users
            .iter()
            .filter(|user| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| user.email.contains(term))
            })
            .cloned()
            .collect();
        page_of(&matching, query.page)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.enter("delete_user", id)?;
        let mut store = self.store.lock().expect("store lock");
        store.users.retain(|user| user.id != id);
        Ok(())
    }
}
