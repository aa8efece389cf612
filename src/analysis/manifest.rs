//! Dependency manifest reader.
//!
//! Only the key names of the `dependencies` and `devDependencies` blocks
//! are consumed; versions are irrelevant to the generated document.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{SyncError, SyncResult};

/// Runtime and development dependency names in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDeps {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl ManifestDeps {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    dependencies: IndexMap<String, Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: IndexMap<String, Value>,
}

/// Read the manifest, treating a missing file as empty.
///
/// A malformed manifest surfaces as a typed error so the failure path is
/// testable; `read_manifest` is the logging wrapper callers actually use.
pub fn try_read_manifest(path: &Path) -> SyncResult<ManifestDeps> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ManifestDeps::default()),
        Err(source) => {
            return Err(SyncError::FileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw: RawManifest = serde_json::from_str(&content).map_err(|source| SyncError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ManifestDeps {
        dependencies: raw.dependencies.into_keys().collect(),
        dev_dependencies: raw.dev_dependencies.into_keys().collect(),
    })
}

/// Read the manifest; any failure yields two empty lists, logged at warn.
pub fn read_manifest(path: &Path) -> ManifestDeps {
    try_read_manifest(path).unwrap_or_else(|e| {
        tracing::warn!("[manifest] {e}");
        ManifestDeps::default()
    })
}
