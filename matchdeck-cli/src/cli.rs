use std::path::PathBuf;

use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "matchdeck")]
#[clap(about = "Browse and like profiles of the matchdeck backend", long_about = None)]
pub struct Cli {
    #[clap(long, global = true, help = "Path to the config file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        short = 'u',
        global = true,
        help = "Username of the logged-in user"
    )]
    pub user: Option<String>,

    #[clap(long, global = true, help = "Bearer token for the backend")]
    pub token: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}
