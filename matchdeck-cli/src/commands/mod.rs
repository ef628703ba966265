use clap::Subcommand;

pub mod account;
mod browse;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Browse(browse::Browse),
    #[command(about = "Show or edit the logged-in account")]
    Account {
        #[clap(subcommand)]
        subcommand: account::Account,
    },
}
