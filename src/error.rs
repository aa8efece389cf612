//! Error types for the synchronization engine.
//!
//! The tool is best-effort by design: almost every error here is caught by
//! the orchestrator, logged, and survived. Keeping the failure paths typed
//! (instead of swallowing them at the call site) is what makes them
//! unit-testable.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from synchronization operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to initialize watcher: {reason}")]
    WatchInit { reason: String },

    #[error("Failed to install hook {path}: {source}")]
    HookInstall {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<notify::Error> for SyncError {
    fn from(e: notify::Error) -> Self {
        SyncError::WatchInit {
            reason: e.to_string(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
