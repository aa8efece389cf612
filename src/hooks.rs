//! Git hook installation.
//!
//! Writes `pre-commit` and `pre-push` scripts that run the one-shot
//! synchronization mode and stage the regenerated document. This is the
//! one place in the tool where failure is fatal: a hooks directory that
//! cannot be created means the install did not happen, and the CLI exits
//! non-zero.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

pub struct HookInstaller {
    project_root: PathBuf,
    /// Relative path of the document the hooks stage, e.g. `README.md`.
    readme: String,
}

impl HookInstaller {
    pub fn new(project_root: PathBuf, readme: String) -> Self {
        Self {
            project_root,
            readme,
        }
    }

    /// Install both hooks, returning the paths written.
    pub fn install(&self) -> SyncResult<Vec<PathBuf>> {
        let hooks_dir = self.project_root.join(".git").join("hooks");
        fs::create_dir_all(&hooks_dir).map_err(|source| SyncError::HookInstall {
            path: hooks_dir.clone(),
            source,
        })?;

        // Embed the absolute binary path so the hooks work regardless of
        // the committing shell's PATH
        let binary = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "docwatch".to_string());

        let hooks = [
            ("pre-commit", self.pre_commit_script(&binary)),
            ("pre-push", self.pre_push_script(&binary)),
        ];

        let mut installed = Vec::new();
        for (name, content) in hooks {
            let path = hooks_dir.join(name);
            fs::write(&path, content).map_err(|source| SyncError::HookInstall {
                path: path.clone(),
                source,
            })?;
            set_executable(&path)?;
            installed.push(path);
        }

        Ok(installed)
    }

    fn pre_commit_script(&self, binary: &str) -> String {
        let readme = &self.readme;
        format!(
            r#"#!/bin/sh
# Refresh {readme} before commit
"{binary}" once

# Stage the document if it changed
git add {readme} 2>/dev/null || true
"#
        )
    }

    fn pre_push_script(&self, binary: &str) -> String {
        let readme = &self.readme;
        format!(
            r#"#!/bin/sh
# Refresh {readme} before push
"{binary}" once

# Stage the document if it changed
git add {readme} 2>/dev/null || true

# Commit if the document changed and is not already committed
if ! git diff --staged --quiet -- {readme} 2>/dev/null; then
  git commit --no-verify -m "docs: auto-update {readme}" -- {readme} 2>/dev/null || true
fi
"#
        )
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> SyncResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        SyncError::HookInstall {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> SyncResult<()> {
    Ok(())
}
