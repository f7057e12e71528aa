use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use devlogs_core::VERSION;

/// DevLogs - Password-protected, encrypted developer journals
#[derive(Parser)]
#[command(name = "devlogs")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding account files
    #[arg(long, global = true, env = "DEVLOGS_HOME", value_name = "DIR")]
    pub accounts_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true, env = "DEVLOGS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Signup(SignupArgs),

    /// Delete an account file
    DeleteAccount(DeleteAccountArgs),

    /// Check whether a password unlocks an account
    Check(AccountArgs),

    /// List entries
    List(ListArgs),

    /// Show a single entry
    Show(ShowArgs),

    /// Add an entry at the end of the list
    Add(AddArgs),

    /// Edit an entry's title or body
    Edit(EditArgs),

    /// Remove an entry
    Rm(EntryArgs),

    /// Move an entry one place up or down
    Move(MoveArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// A username on its own
#[derive(Args)]
pub struct AccountArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,
}

/// Arguments for the `signup` command
#[derive(Args)]
pub struct SignupArgs {
    /// Account username (at most 32 bytes)
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Replace an existing account file
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `delete-account` command
#[derive(Args)]
pub struct DeleteAccountArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Entry position (0-based)
    #[arg(value_name = "POSITION")]
    pub position: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Entry title
    #[arg(short, long)]
    pub title: String,

    /// Entry body (read from stdin if omitted)
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Entry position (0-based)
    #[arg(value_name = "POSITION")]
    pub position: usize,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New body
    #[arg(short, long)]
    pub body: Option<String>,
}

/// An entry addressed by position
#[derive(Args)]
pub struct EntryArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Entry position (0-based)
    #[arg(value_name = "POSITION")]
    pub position: usize,
}

/// Arguments for the `move` command
#[derive(Args)]
pub struct MoveArgs {
    /// Account username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Entry position (0-based)
    #[arg(value_name = "POSITION")]
    pub position: usize,

    /// Direction to move
    #[arg(value_enum, value_name = "DIRECTION")]
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}
