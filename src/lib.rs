//! docwatch keeps a project's README synchronized with the code it
//! documents: classified source files, extracted symbols, and manifest
//! dependencies are folded into machine-owned Markdown sections, either
//! once (for git hooks) or continuously behind a debounced file watcher.

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod sync;
pub mod tracker;
pub mod watcher;

pub use analysis::{
    FileAnalysis, FileClassifier, IgnoreRules, ManifestDeps, SymbolExtractor, SymbolRecord,
};
pub use config::{ChangelogMode, Settings};
pub use error::{SyncError, SyncResult};
pub use sync::{SyncReport, Synchronizer};
pub use tracker::{ChangeTracker, TrackedChanges};
pub use watcher::{Scheduler, SyncWatcher};
