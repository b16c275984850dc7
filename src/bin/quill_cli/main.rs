//! quill-cli: headless client for the blogging API.
#![deny(clippy::all)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use std::process::ExitCode;

use clap::Parser;
use quill::{config, infra::telemetry};

use args::{Cli, Commands};
use client::{CliError, Ctx};
use handlers::{admin, auth, comments, posts};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load(&cli.overrides)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::new(settings).await?;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(&ctx, cmd.action).await,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await,
        Commands::Comments(cmd) => comments::handle(&ctx, cmd.action).await,
        Commands::Admin(cmd) => admin::handle(&ctx, cmd.action).await,
    }
}

#[cfg(test)]
mod tests;
