//! Command-line surface for `quill-cli`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quill::config::GlobalOverrides;

#[derive(Parser, Debug)]
#[command(name = "quill-cli", version, about = "Blog client for the quill REST API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Registration, sign-in and profile
    Auth(AuthArgs),
    /// Public feed and the signed-in author's posts
    Posts(PostsArgs),
    /// Comment threads
    Comments(CommentsArgs),
    /// Moderation and user management (staff only)
    Admin(AdminArgs),
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Create an account; a one-time code is mailed afterwards
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// Ask for a fresh one-time code
    RequestOtp {
        #[arg(long)]
        email: String,
    },
    /// Confirm the one-time code and set a password
    VerifyOtp(CodeArgs),
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Password; read from stdin when omitted
        #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in profile
    Profile,
    /// Change email or username
    UpdateProfile {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// Mail a password reset code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with a reset code
    ResetPassword(CodeArgs),
}

#[derive(Args, Debug)]
pub struct CodeArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub code: String,
    #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List the public feed
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        author: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List your own posts
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show a post with its approved comments
    Show {
        id: i64,
        #[arg(long = "comments-page", default_value_t = 1)]
        comments_page: u32,
    },
    /// Create a post
    Create(PostFields),
    /// Replace one of your posts
    Update {
        id: i64,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete one of your posts
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Like or unlike a post
    Like { id: i64 },
}

#[derive(Args, Debug, Default)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long = "content-file")]
    pub content_file: Option<PathBuf>,
    /// JPEG/PNG/GIF up to 5 MB
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// PDF up to 10 MB
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub action: CommentsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    /// List approved comments on a post
    List {
        #[arg(long)]
        post: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Comment on a post; it shows once approved
    Add {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        content: String,
    },
}

#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminCmd,
}

#[derive(Subcommand, Debug)]
pub enum AdminCmd {
    /// List comments awaiting or past moderation
    Comments {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Approve a comment
    Approve { id: i64 },
    /// Block a comment
    Block {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Delete a comment
    DeleteComment {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// List users
    Users {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Delete a user
    DeleteUser {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}
