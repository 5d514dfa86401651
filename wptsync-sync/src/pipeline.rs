//! Sync pipeline: the per-entry fetch → write → patch sequence.
//!
//! Entries are processed one at a time, in config order. The first failure
//! aborts the run; later entries are never attempted. Progress is reported
//! through a callback *before* each action runs, so a caller printing it
//! shows exactly how far a failed run got.

use std::path::{Path, PathBuf};

use wptsync_core::{config, Config, Deadline, FileEntry};
use wptsync_remote::Fetcher;

use crate::error::SyncError;
use crate::patch::{apply_patch, PatchApplier};
use crate::writer::write_atomic;

/// Run-wide switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Download files but never apply their patches.
    pub skip_patching: bool,
    /// Report planned actions only: no network, no filesystem writes.
    pub dry_run: bool,
}

/// Progress notifications, emitted before the corresponding action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The run is about to process `total` entries.
    Started {
        total: usize,
        origin: String,
        commit: String,
    },
    /// A disabled entry was skipped.
    Skipped { src: String },
    /// `src` is about to be fetched into `dest` (or would be, in dry-run).
    Planned { src: String, dest: PathBuf },
    /// `patch` is about to be applied for `src`.
    Patching { src: String, patch: String },
}

/// Final state of one entry in a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// `enabled: false`; nothing was done.
    Disabled { src: String },
    /// Dry-run: the entry would have been fetched into `dest`.
    WouldWrite { src: String, dest: PathBuf },
    /// Downloaded and written; `patch` holds the resolved patch if one was applied.
    Written {
        src: String,
        dest: PathBuf,
        bytes: u64,
        patch: Option<PathBuf>,
    },
}

/// Outcome of a whole successful run, in config order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub entries: Vec<EntryOutcome>,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.count(|e| matches!(e, EntryOutcome::Written { .. }))
    }

    pub fn patched(&self) -> usize {
        self.count(|e| matches!(e, EntryOutcome::Written { patch: Some(_), .. }))
    }

    pub fn disabled(&self) -> usize {
        self.count(|e| matches!(e, EntryOutcome::Disabled { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|e| matches!(e, EntryOutcome::WouldWrite { .. }))
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }
}

/// Drives one sync run against a working root.
pub struct Pipeline<'a> {
    root: PathBuf,
    fetcher: &'a dyn Fetcher,
    applier: &'a dyn PatchApplier,
}

impl<'a> Pipeline<'a> {
    /// `root` is the directory holding the config file; `target_dir` and
    /// patch paths resolve against it.
    pub fn new(
        root: impl Into<PathBuf>,
        fetcher: &'a dyn Fetcher,
        applier: &'a dyn PatchApplier,
    ) -> Self {
        Self {
            root: root.into(),
            fetcher,
            applier,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate `config`, then process every entry in order.
    ///
    /// `deadline` bounds the whole run, not each file.
    pub fn run(
        &self,
        config: &Config,
        options: SyncOptions,
        deadline: &Deadline,
        mut on_progress: impl FnMut(&Progress),
    ) -> Result<SyncReport, SyncError> {
        config::validate(config)?;

        let mut report = SyncReport::default();
        if config.files.is_empty() {
            return Ok(report);
        }

        on_progress(&Progress::Started {
            total: config.files.len(),
            origin: self.fetcher.origin().to_string(),
            commit: config.commit.clone(),
        });

        for entry in &config.files {
            let outcome = self.process(config, entry, options, deadline, &mut on_progress)?;
            report.entries.push(outcome);
        }
        Ok(report)
    }

    fn process(
        &self,
        config: &Config,
        entry: &FileEntry,
        options: SyncOptions,
        deadline: &Deadline,
        on_progress: &mut impl FnMut(&Progress),
    ) -> Result<EntryOutcome, SyncError> {
        if !entry.is_enabled() {
            tracing::debug!("disabled: {}", entry.src);
            on_progress(&Progress::Skipped {
                src: entry.src.clone(),
            });
            return Ok(EntryOutcome::Disabled {
                src: entry.src.clone(),
            });
        }

        let src = entry.normalized_src().to_string();

        let dest = config.destination(&self.root, entry);
        on_progress(&Progress::Planned {
            src: src.clone(),
            dest: dest.clone(),
        });

        if options.dry_run {
            tracing::info!("[dry-run] would write: {}", dest.display());
            return Ok(EntryOutcome::WouldWrite { src, dest });
        }

        let mut body = self
            .fetcher
            .fetch(&config.commit, &src, deadline)
            .map_err(|source| SyncError::Fetch {
                src: src.clone(),
                source,
            })?;

        let bytes = write_atomic(&dest, &mut body).map_err(|source| SyncError::Write {
            src: src.clone(),
            source,
        })?;

        let patch = match entry.patch.as_deref() {
            Some(patch) if !patch.is_empty() && !options.skip_patching => {
                on_progress(&Progress::Patching {
                    src: src.clone(),
                    patch: patch.to_string(),
                });
                let resolved =
                    apply_patch(self.applier, &self.root, patch, deadline).map_err(|source| {
                        SyncError::Patch {
                            src: src.clone(),
                            patch: patch.to_string(),
                            source,
                        }
                    })?;
                Some(resolved)
            }
            _ => None,
        };

        Ok(EntryOutcome::Written {
            src,
            dest,
            bytes,
            patch,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
