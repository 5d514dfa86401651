//! Domain types for the sync configuration.
//!
//! Everything here is plain data, serializable via serde + serde_json.
//! Remote paths stay `String` (always `/`-separated); local paths are only
//! built as `PathBuf` once they are resolved against the working root.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// File entries
// ---------------------------------------------------------------------------

/// One sync instruction: fetch `src` at the pinned commit and write it to
/// `dst` under the configured target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path within the remote repository.
    pub src: String,
    /// Path relative to `target_dir`.
    pub dst: String,
    /// `None` and `Some(true)` both mean enabled. Kept as an `Option` so an
    /// absent flag stays absent when the config is saved back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Local patch file applied after `dst` is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

impl FileEntry {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            enabled: None,
            patch: None,
        }
    }

    /// True unless `enabled` is explicitly `false`.
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    /// `src` with any leading `/` removed.
    pub fn normalized_src(&self) -> &str {
        self.src.trim_start_matches('/')
    }

    /// `dst` as a relative path. Root and prefix components are dropped so an
    /// absolute-looking `dst` still lands under `target_dir`.
    pub fn relative_dst(&self) -> PathBuf {
        Path::new(&self.dst)
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Root of the `wpt.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Revision of the remote repository every file is fetched at.
    pub commit: String,
    /// Directory, relative to the config file, that holds every `dst`.
    pub target_dir: String,
    /// Processed strictly in this order.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Config {
    pub fn new(commit: impl Into<String>, target_dir: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            target_dir: target_dir.into(),
            files: Vec::new(),
        }
    }

    /// Destination of `entry` under `root`: `root/target_dir/dst`.
    pub fn destination(&self, root: &Path, entry: &FileEntry) -> PathBuf {
        root.join(&self.target_dir).join(entry.relative_dst())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
