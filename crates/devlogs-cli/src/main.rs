//! DevLogs CLI - Password-protected, encrypted developer journals
//!
//! This is the command-line interface for DevLogs. Each invocation unlocks
//! one account, applies a single command, and writes the account back.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use devlogs_core::DevlogsError;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{account, entries, misc};
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            cli_err.exit()
        }
        if let Some(core_err) = err.downcast_ref::<DevlogsError>() {
            if let Some(cli_err) = CliError::from_core(core_err) {
                cli_err.exit()
            }
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = || AppContext::new(cli);
    match &cli.command {
        Commands::Signup(args) => account::handle_signup(&ctx()?, args),
        Commands::DeleteAccount(args) => account::handle_delete_account(&ctx()?, args),
        Commands::Check(args) => account::handle_check(&ctx()?, args),
        Commands::List(args) => entries::handle_list(&ctx()?, args),
        Commands::Show(args) => entries::handle_show(&ctx()?, args),
        Commands::Add(args) => entries::handle_add(&ctx()?, args),
        Commands::Edit(args) => entries::handle_edit(&ctx()?, args),
        Commands::Rm(args) => entries::handle_rm(&ctx()?, args),
        Commands::Move(args) => entries::handle_move(&ctx()?, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
