use quill::application::listing::Outcome;
use quill::application::screens::{FeedScreen, MyPostsScreen, PostDetailScreen};
use quill_api_types::{Comment, Post};
use serde::Serialize;

use crate::args::{PostFields, PostsCmd};
use crate::client::{CliError, Ctx, settle};
use crate::io::{confirm, read_attachment, read_opt_value};
use crate::print::{PageView, post_page, print_json};

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List {
            search,
            author,
            page,
        } => list(ctx, search, author, page).await,
        PostsCmd::Mine { page } => mine(ctx, page).await,
        PostsCmd::Show { id, comments_page } => show(ctx, id, comments_page).await,
        PostsCmd::Create(fields) => save(ctx, None, fields).await,
        PostsCmd::Update { id, fields } => save(ctx, Some(id), fields).await,
        PostsCmd::Delete { id, yes } => delete(ctx, id, yes).await,
        PostsCmd::Like { id } => like(ctx, id).await,
    }
}

async fn list(
    ctx: &Ctx,
    search: Option<String>,
    author: Option<i64>,
    page: u32,
) -> Result<(), CliError> {
    let mut feed = FeedScreen::new(ctx.blog(), ctx.page_size())
        .filtered(search, author)
        .starting_at(page);
    let outcome = feed.load().await;
    settle(outcome, &feed.status)?;
    print_json(&post_page(&feed.posts))
}

async fn mine(ctx: &Ctx, page: u32) -> Result<(), CliError> {
    let mut screen =
        MyPostsScreen::new(ctx.blog(), ctx.session.clone(), ctx.page_size()).starting_at(page);
    let outcome = screen.load().await;
    settle(outcome, &screen.status)?;
    print_json(&post_page(&screen.posts))
}

#[derive(Serialize)]
struct PostDetailView<'a> {
    post: Option<&'a Post>,
    comments: PageView<&'a Comment>,
}

async fn show(ctx: &Ctx, id: i64, comments_page: u32) -> Result<(), CliError> {
    let mut screen = PostDetailScreen::new(ctx.blog(), ctx.session.clone(), id, ctx.page_size())
        .starting_at(comments_page);
    let outcome = screen.open().await;
    settle(outcome, &screen.status)?;
    print_json(&PostDetailView {
        post: screen.post.as_ref(),
        comments: PageView::new(screen.comments.pager(), screen.visible_comments().collect()),
    })
}

/// Create when `id` is `None`, otherwise locate the post among the author's
/// own and replace it. Omitted title or content keeps the stored value.
async fn save(ctx: &Ctx, id: Option<i64>, fields: PostFields) -> Result<(), CliError> {
    let mut screen = MyPostsScreen::new(ctx.blog(), ctx.session.clone(), ctx.page_size());
    settle(screen.load().await, &screen.status)?;

    if let Some(id) = id {
        while !screen.begin_edit(id) {
            let outcome = screen.next_page().await;
            settle(outcome, &screen.status)?;
            if outcome != Outcome::Applied {
                return Err(CliError::InvalidInput(format!(
                    "post {id} is not one of your posts"
                )));
            }
        }
    }

    let PostFields {
        title,
        content,
        content_file,
        image,
        file,
    } = fields;
    if let Some(title) = title {
        screen.form.title = title;
    }
    if let Some(content) = read_opt_value(content, content_file)? {
        screen.form.content = content;
    }
    screen.form.image = read_attachment(image.as_deref()).await?;
    screen.form.file = read_attachment(file.as_deref()).await?;

    match screen.submit().await {
        Outcome::Rejected => Err(CliError::Validation(screen.form.errors().clone())),
        outcome => {
            settle(outcome, &screen.status)?;
            print_json(&post_page(&screen.posts))
        }
    }
}

async fn delete(ctx: &Ctx, id: i64, yes: bool) -> Result<(), CliError> {
    let mut screen = MyPostsScreen::new(ctx.blog(), ctx.session.clone(), ctx.page_size());
    settle(screen.load().await, &screen.status)?;

    screen.request_delete(id);
    if !confirm(&format!("Delete post {id}?"), yes)? {
        screen.cancel();
        eprintln!("Cancelled");
        return Ok(());
    }
    let outcome = screen.confirm().await;
    settle(outcome, &screen.status)?;
    print_json(&post_page(&screen.posts))
}

async fn like(ctx: &Ctx, id: i64) -> Result<(), CliError> {
    let mut screen = PostDetailScreen::new(ctx.blog(), ctx.session.clone(), id, ctx.page_size());
    let outcome = screen.like().await;
    settle(outcome, &screen.status)?;
    print_json(&screen.post)
}
