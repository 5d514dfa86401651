//! `wptsync add <path> [--config <path>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wptsync_core::{config, Deadline, METADATA_BUDGET};
use wptsync_remote::ContentsClient;

use super::RemoteArgs;

/// Add files from a WPT path to the configuration.
///
/// A single .js file is added as-is; a folder is scanned recursively for .js
/// files. Files ending in .any.js are mapped to .js in the destination path.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Path in the WPT repository (e.g. url/, resources/testharness.js).
    pub path: String,

    /// Path to the configuration file.
    #[arg(long, short = 'c', default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl AddArgs {
    pub fn run(self) -> Result<()> {
        let mut cfg = config::load_at(&self.config)?;
        let wpt_path = self.path.trim_matches('/');

        println!("Fetching file list from {wpt_path}...");
        let endpoints = self.remote.endpoints();
        let budget = self.remote.budget(METADATA_BUDGET);
        tracing::debug!(
            "listing {wpt_path} at {} via {}, budget: {}s",
            cfg.commit,
            endpoints.api_base,
            budget.as_secs()
        );
        let deadline = Deadline::after(budget);
        let files = ContentsClient::new(&endpoints)
            .list_files(&cfg.commit, wpt_path, &deadline)
            .context("list files")?;

        if files.is_empty() {
            println!("No .js files found in {wpt_path}");
            return Ok(());
        }

        let added = config::add_sources(&mut cfg, files);
        if added.is_empty() {
            println!("No new files to add (all files already in config).");
            return Ok(());
        }
        for src in &added {
            println!(" + {src}");
        }

        config::save_at(&self.config, &cfg)
            .with_context(|| format!("failed to write '{}'", self.config.display()))?;
        println!("Added {} files to {}", added.len(), self.config.display());
        Ok(())
    }
}
