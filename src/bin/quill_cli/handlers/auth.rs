use quill::application::forms::{LoginForm, ProfileForm, RegisterForm, VerifyForm};
use serde_json::json;
use tracing::warn;

use crate::args::{AuthCmd, CodeArgs};
use crate::client::{CliError, Ctx};
use crate::io::read_secret;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Register { email, username } => {
            let form = RegisterForm { email, username };
            print_json(&ctx.auth.register(form).await?)
        }
        AuthCmd::RequestOtp { email } => print_json(&ctx.auth.request_otp(&email).await?),
        AuthCmd::VerifyOtp(args) => print_json(&ctx.auth.verify_otp(verify_form(args)).await?),
        AuthCmd::Login { email, password } => login(ctx, email, password).await,
        AuthCmd::Logout => logout(ctx).await,
        AuthCmd::Profile => {
            let user = ctx.auth.profile().await?;
            ctx.persist_session().await?;
            print_json(&user)
        }
        AuthCmd::UpdateProfile { email, username } => {
            let user = ctx
                .auth
                .update_profile(ProfileForm { email, username })
                .await?;
            ctx.persist_session().await?;
            print_json(&user)
        }
        AuthCmd::ForgotPassword { email } => {
            print_json(&ctx.auth.forgot_password(&email).await?)
        }
        AuthCmd::ResetPassword(args) => {
            print_json(&ctx.auth.reset_password(verify_form(args)).await?)
        }
    }
}

fn verify_form(args: CodeArgs) -> VerifyForm {
    VerifyForm {
        email: args.email,
        code: args.code,
        password: args.password,
    }
}

async fn login(ctx: &Ctx, email: String, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_secret("Password")?,
    };
    let session = ctx.auth.login(LoginForm { email, password }).await?;
    ctx.persist_session().await?;
    print_json(&session.user)
}

async fn logout(ctx: &Ctx) -> Result<(), CliError> {
    let result = ctx.auth.logout().await;
    ctx.persist_session().await?;
    if let Err(err) = result {
        warn!(error = %err, "server did not acknowledge logout");
    }
    print_json(&json!({ "signed_in": false }))
}
