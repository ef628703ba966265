use anyhow::Context;
use clap::Parser;

use matchdeck::{ClientConfig, HttpApi, Session};

mod cli;
mod commands;
mod error;

use cli::Cli;
use commands::Commands;
use error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let config = ClientConfig::load(args.config.as_deref())
        .context("loading config")?;
    log::debug!("using backend {}", config.api_url);

    let session = match args.user {
        Some(user) => Session::new(user, args.token),
        None => Session::anonymous(),
    };
    let api = HttpApi::new(&config, session.token())?;

    match args.command {
        Commands::Browse(browse) => browse.run(session, api, &config).await?,
        Commands::Account { subcommand } => {
            let username = session
                .username()
                .ok_or(AppError::UserRequired)?;
            subcommand
                .run(&api, username)
                .await
                .with_context(|| format!("account of {username}"))?
        }
    }

    Ok(())
}
