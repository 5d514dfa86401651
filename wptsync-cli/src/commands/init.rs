//! `wptsync init [--config <path>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wptsync_core::{config, Deadline, METADATA_BUDGET};
use wptsync_remote::ContentsClient;

use super::RemoteArgs;

/// Create a configuration file pinned to the latest WPT commit.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the configuration file to create.
    #[arg(long, short = 'c', default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        config::ensure_absent(&self.config)?;

        println!("Fetching latest WPT commit...");
        let endpoints = self.remote.endpoints();
        let budget = self.remote.budget(METADATA_BUDGET);
        tracing::debug!("api base: {}, budget: {}s", endpoints.api_base, budget.as_secs());
        let deadline = Deadline::after(budget);
        let commit = ContentsClient::new(&endpoints)
            .latest_commit(&deadline)
            .context("fetch latest commit")?;

        config::create_at(&self.config, &commit)
            .with_context(|| format!("failed to create '{}'", self.config.display()))?;

        println!("Created {} with commit {}", self.config.display(), commit);
        Ok(())
    }
}
