//! Loading, validating and persisting `wpt.json`.
//!
//! # API pattern
//!
//! The config is loaded fresh on every invocation, optionally mutated in
//! memory (`add_sources`), and written back over the same path. Nothing is
//! cached between runs.
//!
//! Writes go through a `.tmp` sibling + `rename`, same as every other
//! file this tool produces.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ConfigError};
use crate::types::{Config, FileEntry};

/// Default config file name, resolved against the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "wpt.json";

/// `target_dir` written by [`create_at`].
pub const DEFAULT_TARGET_DIR: &str = "wpt";

/// Remote files that [`add_sources`] picks up.
pub const SOURCE_EXTENSION: &str = ".js";

const HARNESS_SUFFIX: &str = ".any.js";

// ---------------------------------------------------------------------------
// 1. Load / validate
// ---------------------------------------------------------------------------

/// Load a config from `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed JSON.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A config is processable iff `commit` and `target_dir` are both non-empty.
/// An empty `files` list is valid.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.commit.is_empty() {
        return Err(ConfigError::MissingField { field: "commit" });
    }
    if config.target_dir.is_empty() {
        return Err(ConfigError::MissingField {
            field: "target_dir",
        });
    }
    Ok(())
}

/// Absolute directory containing the config file. `target_dir` and relative
/// patch paths are resolved against it.
pub fn working_root(config_path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::path::absolute(dir).map_err(|e| io_err(dir, e))
}

// ---------------------------------------------------------------------------
// 2. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `config` to `path` as two-space-indented JSON.
///
/// Write flow: serialize → `<name>.tmp` sibling → `rename`.
pub fn save_at(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp_path, json).map_err(|e| io_err(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    tracing::debug!("saved config: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Init
// ---------------------------------------------------------------------------

/// Fail with `ConfigError::AlreadyExists` if something is already at `path`.
pub fn ensure_absent(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Create a fresh config pinned to `commit` with an empty file list.
///
/// Not idempotent: an existing file at `path` is an error, never overwritten.
pub fn create_at(path: &Path, commit: &str) -> Result<Config, ConfigError> {
    ensure_absent(path)?;
    let config = Config::new(commit, DEFAULT_TARGET_DIR);
    save_at(path, &config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// 4. Add files
// ---------------------------------------------------------------------------

/// Destination for a remote source path: `foo.any.js` becomes `foo.js`,
/// everything else is kept as-is.
pub fn dst_for_src(src: &str) -> String {
    match src.strip_suffix(HARNESS_SUFFIX) {
        Some(stem) => format!("{stem}{SOURCE_EXTENSION}"),
        None => src.to_string(),
    }
}

/// Append one entry per source not already present in `config`, in input
/// order. Returns the sources that were added.
pub fn add_sources<I, S>(config: &mut Config, sources: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut added = Vec::new();
    for src in sources {
        let src = src.into();
        if config.files.iter().any(|f| f.src == src) {
            continue;
        }
        config
            .files
            .push(FileEntry::new(src.clone(), dst_for_src(&src)));
        added.push(src);
    }
    added
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wpt.json");
        let mut config = Config::new("abc123", "tests/wpt");
        config.files.push(FileEntry {
            src: "resources/testharness.js".into(),
            dst: "resources/testharness.js".into(),
            enabled: None,
            patch: Some("patches/testharness.js.patch".into()),
        });

        save_at(&path, &config).expect("save");
        let loaded = load_at(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn save_cleans_up_tmp() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wpt.json");
        save_at(&path, &Config::new("abc", "wpt")).expect("save");
        assert!(!dir.path().join("wpt.json.tmp").exists());
    }

    #[test]
    fn save_uses_two_space_indent() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wpt.json");
        save_at(&path, &Config::new("abc", "wpt")).expect("save");
        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("\n  \"commit\": \"abc\""), "got: {text}");
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wpt.json");
        std::fs::write(&path, "{}").expect("write");
        let err = create_at(&path, "abc").unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn create_writes_default_target_dir() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wpt.json");
        let created = create_at(&path, "abc").expect("create");
        assert_eq!(created.target_dir, DEFAULT_TARGET_DIR);
        assert!(created.files.is_empty());
        assert_eq!(load_at(&path).expect("load"), created);
    }

    #[test]
    fn working_root_of_bare_file_name_is_cwd() {
        let root = working_root(Path::new("wpt.json")).expect("root");
        assert!(root.is_absolute());
        assert_eq!(root, std::path::absolute(".").expect("cwd"));
    }

    #[test]
    fn any_js_maps_to_js() {
        assert_eq!(dst_for_src("url/url-setters.any.js"), "url/url-setters.js");
        assert_eq!(dst_for_src("resources/testharness.js"), "resources/testharness.js");
    }

    #[test]
    fn add_sources_dedupes_existing_and_repeated() {
        let mut config = Config::new("abc", "wpt");
        config.files.push(FileEntry::new("url/a.any.js", "custom/a.js"));

        let added = add_sources(
            &mut config,
            ["url/a.any.js", "url/b.any.js", "url/b.any.js", "url/c.js"],
        );

        assert_eq!(added, vec!["url/b.any.js", "url/c.js"]);
        assert_eq!(config.files.len(), 3);
        assert_eq!(config.files[0].dst, "custom/a.js");
        assert_eq!(config.files[1].dst, "url/b.js");
        assert_eq!(config.files[2].dst, "url/c.js");
    }
}
