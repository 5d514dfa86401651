//! wptsync: sync pinned web-platform-tests files into a local tree.
//!
//! # Usage
//!
//! ```text
//! wptsync init [--config wpt.json]
//! wptsync add <path> [--config wpt.json]
//! wptsync [sync] [--config wpt.json] [--dry-run] [--skip-patches]
//! wptsync help
//! ```

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{add::AddArgs, init::InitArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wptsync",
    version,
    about = "Sync files from the web-platform-tests repository",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    // With no subcommand, `sync` runs with these arguments.
    #[command(flatten)]
    sync: SyncArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new wpt.json pinned to the latest WPT commit.
    Init(InitArgs),

    /// Add the .js files under a WPT path to the configuration.
    Add(AddArgs),

    /// Download WPT files according to the configuration (default).
    Sync(SyncArgs),
}

impl Cli {
    fn verbose(&self) -> bool {
        match &self.command {
            None => self.sync.remote.verbose,
            Some(Commands::Init(args)) => args.remote.verbose,
            Some(Commands::Add(args)) => args.remote.verbose,
            Some(Commands::Sync(args)) => args.remote.verbose,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose());

    match cli.command {
        None => cli.sync.run(),
        Some(Commands::Init(args)) => args.run(),
        Some(Commands::Add(args)) => args.run(),
        Some(Commands::Sync(args)) => args.run(),
    }
}
