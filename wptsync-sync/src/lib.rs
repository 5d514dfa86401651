//! # wptsync-sync
//!
//! Atomic writer, patch applier and the sync pipeline that drives them.
//!
//! Build a [`Pipeline`] from a [`wptsync_remote::Fetcher`] and a
//! [`PatchApplier`], then call [`Pipeline::run`] with a loaded config.

pub mod error;
pub mod patch;
pub mod pipeline;
pub mod writer;

pub use error::{PatchError, SyncError, WriteError};
pub use patch::{apply_patch, GitApply, PatchApplier};
pub use pipeline::{EntryOutcome, Pipeline, Progress, SyncOptions, SyncReport};
pub use writer::write_atomic;
