//! `wptsync sync`: download configured files and apply their patches.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wptsync_core::{config, Deadline, SYNC_BUDGET};
use wptsync_remote::HttpFetcher;
use wptsync_sync::{GitApply, Pipeline, Progress, SyncOptions, SyncReport};

use super::RemoteArgs;

/// Arguments for `wptsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the WPT sync configuration file.
    #[arg(long, short = 'c', default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print the actions that would be taken without writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Download files but do not apply any configured patches.
    #[arg(long)]
    pub skip_patches: bool,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let root = config::working_root(&self.config)
            .context("determine working root from config path")?;
        let cfg = config::load_at(&self.config)?;
        let endpoints = self.remote.endpoints();
        let budget = self.remote.budget(SYNC_BUDGET);
        tracing::debug!(
            "root: {}, raw base: {}, budget: {}s",
            root.display(),
            endpoints.raw_base,
            budget.as_secs()
        );

        let fetcher = HttpFetcher::new(&endpoints);
        let applier = GitApply::default();
        let pipeline = Pipeline::new(root, &fetcher, &applier);

        let options = SyncOptions {
            skip_patching: self.skip_patches,
            dry_run: self.dry_run,
        };
        let deadline = Deadline::after(budget);

        let report = pipeline
            .run(&cfg, options, &deadline, print_progress)
            .context("sync failed")?;

        if report.entries.is_empty() {
            println!("No files configured to sync.");
            return Ok(());
        }
        print_summary(&report, self.dry_run);
        Ok(())
    }
}

fn print_progress(progress: &Progress) {
    match progress {
        Progress::Started {
            total,
            origin,
            commit,
        } => println!("Syncing {total} WPT files from {origin} at commit {commit}"),
        Progress::Skipped { src } => {
            println!("{}", format!(" - skipping {src} (disabled)").dimmed())
        }
        Progress::Planned { src, dest } => println!(" - {src} -> {}", dest.display()),
        Progress::Patching { patch, .. } => println!("   patching with {patch}"),
    }
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    if dry_run {
        println!(
            "{}",
            format!(
                "[dry-run] ✓ would sync {} files ({} disabled)",
                report.planned(),
                report.disabled()
            )
            .green()
        );
        return;
    }

    println!(
        "{}",
        format!(
            "✓ synced {} files ({} patched, {} disabled)",
            report.written(),
            report.patched(),
            report.disabled()
        )
        .green()
    );
}
