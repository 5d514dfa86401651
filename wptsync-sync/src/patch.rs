//! Patch application.
//!
//! [`apply_patch`] resolves and vets the patch file, then hands it to a
//! [`PatchApplier`]. The production applier is [`GitApply`], which shells out
//! to `git apply` in the working root and lets git report rejected hunks on
//! the inherited stderr.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::Duration;

use wptsync_core::Deadline;

use crate::error::PatchError;

/// First line of the `apply_patch` envelope format, which `git apply` cannot read.
pub const FOREIGN_PATCH_SENTINEL: &str = "*** Begin Patch";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Something that can apply a unified diff to a working tree.
pub trait PatchApplier {
    /// Apply the patch at `patch` (absolute, already vetted) with `root` as
    /// the working directory.
    fn apply(&self, root: &Path, patch: &Path, deadline: &Deadline) -> Result<(), PatchError>;
}

/// `patch` as-is when absolute, otherwise joined onto `root`.
pub fn resolve_patch_path(root: &Path, patch: &str) -> PathBuf {
    let patch = Path::new(patch);
    if patch.is_absolute() {
        patch.to_path_buf()
    } else {
        root.join(patch)
    }
}

/// Reject a patch whose first non-blank line is [`FOREIGN_PATCH_SENTINEL`].
pub fn check_format(path: &Path) -> Result<(), PatchError> {
    let read_err = |source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(read_err)?);

    // Bytes, not `lines()`: a diff of a non-UTF-8 file is still a diff.
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(read_err)? == 0 {
            return Ok(());
        }
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with(FOREIGN_PATCH_SENTINEL.as_bytes()) {
            return Err(PatchError::WrongFormat {
                path: path.to_path_buf(),
            });
        }
        return Ok(());
    }
}

/// Resolve `patch` against `root`, confirm it exists and is a unified diff,
/// then apply it. Returns the resolved path.
pub fn apply_patch(
    applier: &dyn PatchApplier,
    root: &Path,
    patch: &str,
    deadline: &Deadline,
) -> Result<PathBuf, PatchError> {
    let path = resolve_patch_path(root, patch);
    if !path.is_file() {
        return Err(PatchError::NotFound { path });
    }
    check_format(&path)?;
    applier.apply(root, &path, deadline)?;
    tracing::info!("patched with {}", path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// git apply
// ---------------------------------------------------------------------------

/// Runs `git apply --allow-empty --whitespace=nowarn <patch>`.
#[derive(Debug, Clone)]
pub struct GitApply {
    program: String,
}

impl Default for GitApply {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitApply {
    /// Use a specific `git` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PatchApplier for GitApply {
    fn apply(&self, root: &Path, patch: &Path, deadline: &Deadline) -> Result<(), PatchError> {
        let timed_out = |source| PatchError::TimedOut {
            path: patch.to_path_buf(),
            source,
        };
        deadline.remaining().map_err(timed_out)?;

        tracing::debug!(
            "{} apply --allow-empty --whitespace=nowarn {} (in {})",
            self.program,
            patch.display(),
            root.display()
        );
        let mut child = Command::new(&self.program)
            .args(["apply", "--allow-empty", "--whitespace=nowarn"])
            .arg(patch)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| PatchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let status = loop {
            let polled = child.try_wait().map_err(|source| PatchError::Spawn {
                program: self.program.clone(),
                source,
            })?;
            if let Some(status) = polled {
                break status;
            }
            if let Err(expired) = deadline.remaining() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out(expired));
            }
            sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(PatchError::ApplyFailed {
                path: patch.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl PatchApplier for Recording {
        fn apply(&self, _root: &Path, patch: &Path, _: &Deadline) -> Result<(), PatchError> {
            self.calls.borrow_mut().push(patch.to_path_buf());
            Ok(())
        }
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(30))
    }

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn relative_patch_resolves_against_root() {
        let root = Path::new("/work");
        assert_eq!(
            resolve_patch_path(root, "patches/a.patch"),
            PathBuf::from("/work/patches/a.patch")
        );
        assert_eq!(
            resolve_patch_path(root, "/abs/a.patch"),
            PathBuf::from("/abs/a.patch")
        );
    }

    #[test]
    fn missing_patch_is_not_found() {
        let root = TempDir::new().unwrap();
        let applier = Recording::default();
        let err = apply_patch(&applier, root.path(), "nope.patch", &deadline()).unwrap_err();
        assert!(matches!(err, PatchError::NotFound { .. }), "got: {err}");
        assert!(applier.calls.borrow().is_empty());
    }

    #[test]
    fn foreign_format_rejected_without_invoking_applier() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("fix.patch"),
            "\n   \n*** Begin Patch\n*** Update File: a.js\n",
        )
        .unwrap();
        let applier = Recording::default();

        let err = apply_patch(&applier, root.path(), "fix.patch", &deadline()).unwrap_err();

        assert!(matches!(err, PatchError::WrongFormat { .. }), "got: {err}");
        assert!(err.to_string().contains("git diff >"));
        assert!(applier.calls.borrow().is_empty());
    }

    #[test]
    fn sentinel_after_first_line_is_accepted() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("fix.patch");
        fs::write(&path, "diff --git a/a.js b/a.js\n*** Begin Patch\n").unwrap();
        check_format(&path).unwrap();
    }

    #[test]
    fn non_utf8_first_line_passes_format_check() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("latin1.patch"),
            b"--- a/x\xe9.js\n+++ b/x\xe9.js\n".as_slice(),
        )
        .unwrap();
        let applier = Recording::default();

        apply_patch(&applier, root.path(), "latin1.patch", &deadline()).unwrap();
        assert_eq!(applier.calls.borrow().len(), 1);
    }

    #[test]
    fn unified_diff_is_handed_to_applier_resolved() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("patches")).unwrap();
        fs::write(root.path().join("patches/a.patch"), "--- a/x\n+++ b/x\n").unwrap();
        let applier = Recording::default();

        let resolved = apply_patch(&applier, root.path(), "patches/a.patch", &deadline()).unwrap();

        assert_eq!(resolved, root.path().join("patches/a.patch"));
        assert_eq!(applier.calls.borrow().as_slice(), [resolved]);
    }

    #[test]
    fn empty_patch_file_passes_format_check() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("empty.patch");
        fs::write(&path, "").unwrap();
        check_format(&path).unwrap();
    }

    #[test]
    fn git_apply_rewrites_file() {
        if !git_available() {
            return;
        }
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("out/a")).unwrap();
        fs::write(root.path().join("out/a/b.js"), "console.log(1)\n").unwrap();
        fs::write(
            root.path().join("fix.patch"),
            "--- a/out/a/b.js\n+++ b/out/a/b.js\n@@ -1 +1 @@\n-console.log(1)\n+console.log(2)\n",
        )
        .unwrap();

        apply_patch(&GitApply::default(), root.path(), "fix.patch", &deadline()).unwrap();

        assert_eq!(
            fs::read_to_string(root.path().join("out/a/b.js")).unwrap(),
            "console.log(2)\n"
        );
    }

    #[test]
    fn git_apply_failure_is_apply_failed() {
        if !git_available() {
            return;
        }
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("b.js"), "something else\n").unwrap();
        fs::write(
            root.path().join("fix.patch"),
            "--- a/b.js\n+++ b/b.js\n@@ -1 +1 @@\n-console.log(1)\n+console.log(2)\n",
        )
        .unwrap();

        let err =
            apply_patch(&GitApply::default(), root.path(), "fix.patch", &deadline()).unwrap_err();
        assert!(matches!(err, PatchError::ApplyFailed { .. }), "got: {err}");
        assert_eq!(
            fs::read_to_string(root.path().join("b.js")).unwrap(),
            "something else\n"
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("fix.patch"), "").unwrap();
        let applier = GitApply::with_program("wptsync-no-such-git");
        let err = apply_patch(&applier, root.path(), "fix.patch", &deadline()).unwrap_err();
        assert!(matches!(err, PatchError::Spawn { .. }), "got: {err}");
    }

    #[test]
    #[cfg(unix)]
    fn hung_applier_is_killed_at_deadline() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;

        let root = TempDir::new().unwrap();
        fs::write(root.path().join("fix.patch"), "").unwrap();
        let script = root.path().join("slow-git");
        fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let applier = GitApply::with_program(script.to_string_lossy());
        let started = Instant::now();
        let err = apply_patch(
            &applier,
            root.path(),
            "fix.patch",
            &Deadline::after(Duration::from_millis(300)),
        )
        .unwrap_err();

        assert!(matches!(err, PatchError::TimedOut { .. }), "got: {err}");
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "child must be killed near the deadline, took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn expired_budget_never_spawns() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("fix.patch"), "").unwrap();
        let applier = GitApply::with_program("wptsync-no-such-git");
        let err = apply_patch(
            &applier,
            root.path(),
            "fix.patch",
            &Deadline::after(Duration::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::TimedOut { .. }), "got: {err}");
    }
}
