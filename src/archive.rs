//! Archiving the files a load session leaves in the workspace.
//!
//! The console writes a family of files sharing the session's base name
//! (`.ls`, `.dat`, `.isd`, `.mdb`, `.sdb`). After a session they are copied
//! into the current build's artifact directory, keeping their
//! workspace-relative names, so later reports can compare against them.
//!
//! Archiving is best effort. Failures are logged and never fail the step.

use anyhow::{Context, Result};
use std::path::Path;

use crate::constants::SESSION_EXTENSIONS;
use crate::utils::platform::normalize_path_for_storage;
use crate::utils::{is_absolute_name, replace_extension};

/// Workspace-relative names of the session file family, forward-slashed.
#[must_use]
pub fn session_family(session_name: &str) -> Vec<String> {
    SESSION_EXTENSIONS
        .iter()
        .map(|ext| normalize_path_for_storage(replace_extension(session_name, ext)))
        .collect()
}

/// Copy the session file family from `workspace` into `artifact_dir`.
///
/// Returns how many files were archived. Absolute session names are not
/// archived, and files that are missing or fail to copy are skipped.
pub fn archive_session_files(workspace: &Path, session_name: &str, artifact_dir: &Path) -> usize {
    if is_absolute_name(session_name) {
        tracing::info!(target: "webload::archive", "Not archiving from absolute path {}", session_name);
        return 0;
    }

    let mut archived = 0;
    for name in session_family(session_name) {
        tracing::info!(target: "webload::archive", "Archiving {}", name);
        match archive_one(workspace, &name, artifact_dir) {
            Ok(true) => archived += 1,
            Ok(false) => {
                tracing::debug!(target: "webload::archive", "Nothing to archive at {}", name);
            }
            Err(e) => {
                tracing::warn!(target: "webload::archive", "Failed archiving {}: {:#}", name, e);
            }
        }
    }
    archived
}

fn archive_one(workspace: &Path, name: &str, artifact_dir: &Path) -> Result<bool> {
    let source = workspace.join(name);
    if !source.is_file() {
        return Ok(false);
    }

    let target = artifact_dir.join(name);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::copy(&source, &target).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_family() {
        assert_eq!(
            session_family("runs\\nightly.ls"),
            vec!["runs/nightly.ls", "runs/nightly.dat", "runs/nightly.isd", "runs/nightly.mdb", "runs/nightly.sdb"]
        );
    }

    #[test]
    fn test_archives_present_siblings() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("ws");
        let archive = temp.path().join("archive");
        std::fs::create_dir_all(workspace.join("runs")).unwrap();
        std::fs::write(workspace.join("runs/demo.ls"), "ls").unwrap();
        std::fs::write(workspace.join("runs/demo.dat"), "dat").unwrap();

        let count = archive_session_files(&workspace, "runs/demo.ls", &archive);
        assert_eq!(count, 2);
        assert_eq!(std::fs::read_to_string(archive.join("runs/demo.ls")).unwrap(), "ls");
        assert_eq!(std::fs::read_to_string(archive.join("runs/demo.dat")).unwrap(), "dat");
        assert!(!archive.join("runs/demo.mdb").exists());
    }

    #[test]
    fn test_absolute_session_name_not_archived() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("archive");
        let session = temp.path().join("demo.ls");
        std::fs::write(&session, "ls").unwrap();

        let count = archive_session_files(temp.path(), &session.display().to_string(), &archive);
        assert_eq!(count, 0);
        assert!(!archive.exists());
        assert_eq!(archive_session_files(temp.path(), "C:\\runs\\demo.ls", &archive), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_copy_failure_is_swallowed() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("ws");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(workspace.join("demo.ls"), "ls").unwrap();
        // A file where the archive directory should be makes every copy fail.
        let archive = temp.path().join("archive");
        std::fs::write(&archive, "not a directory").unwrap();

        assert_eq!(archive_session_files(&workspace, "demo.ls", &archive), 0);
    }
}
