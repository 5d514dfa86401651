//! Error types for wptsync-sync.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use wptsync_core::{ConfigError, Expired};
use wptsync_remote::FetchError;

/// Failures of the atomic writer. Every variant leaves the destination as it
/// was before the call.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("create destination directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("create temp file in {dir}: {source}")]
    TempFile {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write temp file {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sync temp file {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("move file into place at {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of patch resolution, validation and application.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("patch {path} not found")]
    NotFound { path: PathBuf },

    #[error("read patch {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "patch {path} looks like apply_patch format; regenerate it with `git diff > {path}` so git apply can read it"
    )]
    WrongFormat { path: PathBuf },

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git apply failed for {path}: {status}")]
    ApplyFailed { path: PathBuf, status: ExitStatus },

    #[error("applying {path}: {source}")]
    TimedOut {
        path: PathBuf,
        #[source]
        source: Expired,
    },
}

/// All errors that can abort a sync run. Lower errors keep their kind and
/// gain the entry (and stage) they failed on.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("download {src}: {source}")]
    Fetch {
        src: String,
        #[source]
        source: FetchError,
    },

    #[error("write {src}: {source}")]
    Write {
        src: String,
        #[source]
        source: WriteError,
    },

    #[error("apply patch {patch} for {src}: {source}")]
    Patch {
        src: String,
        patch: String,
        #[source]
        source: PatchError,
    },
}
