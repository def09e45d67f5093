//! quire-cli: command-line client for the blog backend.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use std::process::ExitCode;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, Ctx};
use handlers::{articles, auth, categories, comments, tags};
use quire::{config, infra::telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::load(&cli.global)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::new(settings)?;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(&ctx, cmd.action).await,
        Commands::Categories(cmd) => categories::handle(&ctx, cmd.action).await,
        Commands::Tags(cmd) => tags::handle(&ctx, cmd.action).await,
        Commands::Comments(cmd) => comments::handle(&ctx, cmd.action).await,
        Commands::Articles(cmd) => articles::handle(&ctx, cmd.action).await,
    }
}

fn report(err: &CliError) {
    match err {
        CliError::App { op, source } => print::print_notice(&source.report(*op)),
        other => eprintln!("error: {other}"),
    }
}
