//! Synchronization orchestrator.
//!
//! Ties classification, extraction, rendering, and merging together into a
//! single pass over the project. Every sub-step failure is caught and
//! logged here; a pass never raises. This is what makes the one-shot mode
//! safe to call from a version-control hook: the invoking process can never
//! be blocked or aborted by this tool, even under total failure.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::analysis::{FileClassifier, SymbolExtractor, path_key, read_manifest};
use crate::config::Settings;
use crate::document::{
    DEPENDENCIES_HEADING, STRUCTURE_HEADING, SYMBOLS_HEADING, merge_changelog, merge_section,
    render_changelog, render_dependencies, render_symbols, render_tree,
};
use crate::tracker::{ChangeTracker, TrackedChanges};

/// What a pass actually accomplished. Purely informational; failures have
/// already been logged by the time the report is returned.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub files_scanned: usize,
    pub symbols_found: usize,
    pub changes_recorded: usize,
    pub state_saved: bool,
    pub document_written: bool,
}

pub struct Synchronizer {
    settings: Settings,
    classifier: FileClassifier,
    extractor: SymbolExtractor,
    tracker: ChangeTracker,
    extensions: HashSet<String>,
}

impl Synchronizer {
    pub fn new(settings: Settings) -> Self {
        let classifier = FileClassifier::from_settings(&settings);
        let tracker = ChangeTracker::new(settings.state_file());
        let extensions = settings.watch.extensions.iter().cloned().collect();
        Self {
            classifier,
            extractor: SymbolExtractor::new(),
            tracker,
            extensions,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// One-shot synchronization: every classified file is marked as seen
    /// (first-seen stamps preserved) and the document fully regenerated.
    pub fn run_once(&self) -> SyncReport {
        let mut changes = self.tracker.load();
        let now = Utc::now();

        let files = self.classifier.classify();
        for file in &files {
            changes.mark_seen(&path_key(file), now);
        }
        changes.last_update = Some(now);

        self.finish_pass(changes, files, 0, now)
    }

    /// Watcher-driven synchronization: only the queued paths get a fresh
    /// change stamp, but symbol and dependency content is always rebuilt
    /// from the full file set.
    pub fn run_batch(&self, changed: &[String]) -> SyncReport {
        let mut changes = self.tracker.load();
        let now = Utc::now();

        for path in changed {
            changes.record_change(path, now);
        }
        changes.last_update = Some(now);

        let files = self.classifier.classify();
        self.finish_pass(changes, files, changed.len(), now)
    }

    fn finish_pass(
        &self,
        changes: TrackedChanges,
        files: Vec<PathBuf>,
        changes_recorded: usize,
        now: DateTime<Utc>,
    ) -> SyncReport {
        let mut report = SyncReport {
            files_scanned: files.len(),
            changes_recorded,
            ..SyncReport::default()
        };

        // History tracking failure must not stop the document update
        match self.tracker.save(&changes) {
            Ok(()) => report.state_saved = true,
            Err(e) => tracing::error!("[sync] could not save tracking state: {e}"),
        }

        let root = self.settings.root();
        let mut all_functions = Vec::new();
        for file in &files {
            let Some(analysis) =
                self.extractor
                    .analyze_file(&root.join(file), &path_key(file), &self.extensions)
            else {
                continue;
            };
            all_functions.extend(analysis.functions);
        }
        report.symbols_found = all_functions.len();

        let deps = read_manifest(&self.settings.manifest_file());

        let readme_path = self.settings.readme_file();
        let mut document = read_document(&readme_path);
        document = merge_section(&document, STRUCTURE_HEADING, &render_tree(&files));
        document = merge_section(&document, SYMBOLS_HEADING, &render_symbols(&all_functions));
        document = merge_section(&document, DEPENDENCIES_HEADING, &render_dependencies(&deps));
        let block = render_changelog(&changes, self.settings.changelog.max_entries, now);
        document = merge_changelog(&document, &block, self.settings.changelog.mode);

        match std::fs::write(&readme_path, &document) {
            Ok(()) => {
                report.document_written = true;
                crate::log_event!(
                    "sync",
                    "document updated",
                    "{} files, {} symbols",
                    report.files_scanned,
                    report.symbols_found
                );
            }
            Err(e) => {
                tracing::error!("[sync] could not write {}: {e}", readme_path.display());
            }
        }

        report
    }
}

/// Read the target document, treating a missing file as an empty one.
fn read_document(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                "[sync] {} not found, starting from an empty document",
                path.display()
            );
            String::new()
        }
        Err(e) => {
            tracing::warn!("[sync] could not read {}: {e}", path.display());
            String::new()
        }
    }
}
