use quill::application::screens::{AdminAction, AdminDashboard};

use crate::args::AdminCmd;
use crate::client::{CliError, Ctx, settle};
use crate::io::confirm;
use crate::print::{page_of, print_json};

pub async fn handle(ctx: &Ctx, cmd: AdminCmd) -> Result<(), CliError> {
    let dashboard = AdminDashboard::new(ctx.blog(), ctx.session.clone(), ctx.page_size());
    match cmd {
        AdminCmd::Comments { page } => {
            let mut dashboard = dashboard.starting_at(page, 1);
            let outcome = dashboard.load_comments().await;
            settle(outcome, &dashboard.status)?;
            print_json(&page_of(&dashboard.comments))
        }
        AdminCmd::Approve { id } => {
            let mut dashboard = dashboard;
            let outcome = dashboard.approve(id).await;
            settle(outcome, &dashboard.status)?;
            print_json(&page_of(&dashboard.comments))
        }
        AdminCmd::Block { id, yes } => {
            gated(dashboard, AdminAction::BlockComment, id, yes).await
        }
        AdminCmd::DeleteComment { id, yes } => {
            gated(dashboard, AdminAction::DeleteComment, id, yes).await
        }
        AdminCmd::Users { search, page } => {
            let mut dashboard = dashboard.searching(search).starting_at(1, page);
            let outcome = dashboard.load_users().await;
            settle(outcome, &dashboard.status)?;
            print_json(&page_of(&dashboard.users))
        }
        AdminCmd::DeleteUser { id, yes } => {
            gated(dashboard, AdminAction::DeleteUser, id, yes).await
        }
    }
}

/// Open the gate, ask, then confirm or cancel. Prints the refreshed list the
/// action touched.
async fn gated(
    mut dashboard: AdminDashboard,
    action: AdminAction,
    id: i64,
    yes: bool,
) -> Result<(), CliError> {
    let outcome = dashboard.request(action, id);
    settle(outcome, &dashboard.status)?;

    if !confirm(&format!("Really {} {id}?", action.describe()), yes)? {
        dashboard.cancel();
        eprintln!("Cancelled");
        return Ok(());
    }
    let outcome = dashboard.confirm().await;
    settle(outcome, &dashboard.status)?;
    match action {
        AdminAction::DeleteUser => print_json(&page_of(&dashboard.users)),
        AdminAction::BlockComment | AdminAction::DeleteComment => {
            print_json(&page_of(&dashboard.comments))
        }
    }
}
