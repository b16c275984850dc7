use quill::application::listing::Outcome;
use quill::application::screens::PostDetailScreen;

use crate::args::CommentsCmd;
use crate::client::{CliError, Ctx, settle};
use crate::print::{PageView, print_json};

pub async fn handle(ctx: &Ctx, cmd: CommentsCmd) -> Result<(), CliError> {
    match cmd {
        CommentsCmd::List { post, page } => {
            let mut screen =
                PostDetailScreen::new(ctx.blog(), ctx.session.clone(), post, ctx.page_size())
                    .starting_at(page);
            let outcome = screen.load_comments().await;
            settle(outcome, &screen.status)?;
            print_json(&PageView::new(
                screen.comments.pager(),
                screen.visible_comments().collect(),
            ))
        }
        CommentsCmd::Add { post, content } => {
            let mut screen =
                PostDetailScreen::new(ctx.blog(), ctx.session.clone(), post, ctx.page_size());
            screen.comment_form.content = content;
            match screen.submit_comment().await {
                Outcome::Rejected => {
                    Err(CliError::Validation(screen.comment_form.errors().clone()))
                }
                outcome => {
                    settle(outcome, &screen.status)?;
                    eprintln!("Comment submitted; it appears once approved");
                    print_json(&PageView::new(
                        screen.comments.pager(),
                        screen.visible_comments().collect(),
                    ))
                }
            }
        }
    }
}
