//! Debounced file watching that drives synchronization passes.
//!
//! # Architecture
//!
//! ```text
//! notify::RecommendedWatcher
//!       | (blocking_send)
//!   mpsc channel
//!       |
//! SyncWatcher::watch  -- single task
//!   - filters events (document, state file, ignore globs)
//!   - Scheduler debounces the batch
//!   - runs one Synchronizer pass per quiet period
//! ```
//!
//! Passes run inline on the loop task, so no two passes can overlap;
//! events arriving mid-pass buffer in the channel and join the next batch.
//! Watching continues until the process is terminated.

mod scheduler;

pub use scheduler::Scheduler;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

use crate::analysis::{IgnoreRules, path_key};
use crate::error::SyncResult;
use crate::sync::Synchronizer;

/// Interval between debounce-readiness checks.
const POLL_INTERVAL_MS: u64 = 100;

/// Watches the configured roots and re-synchronizes after quiet periods.
pub struct SyncWatcher {
    synchronizer: Synchronizer,
    scheduler: Scheduler,
    ignore: IgnoreRules,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    /// The underlying file watcher; kept alive for the lifetime of the loop.
    _watcher: notify::RecommendedWatcher,
    project_root: PathBuf,
    readme_key: String,
    state_key: String,
}

impl SyncWatcher {
    pub fn new(synchronizer: Synchronizer) -> SyncResult<Self> {
        let settings = synchronizer.settings();

        let (tx, rx) = mpsc::channel(100);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        // Event paths come back absolute; canonicalize the root so they
        // can be relativized against it.
        let configured_root = settings.root();
        let project_root = configured_root
            .canonicalize()
            .unwrap_or(configured_root);

        for root in &settings.watch.roots {
            let dir = project_root.join(root);
            if !dir.is_dir() {
                crate::debug_event!("watcher", "skipping missing root", "{}", dir.display());
                continue;
            }
            match watcher.watch(&dir, RecursiveMode::Recursive) {
                Ok(()) => crate::debug_event!("watcher", "watching", "{}", dir.display()),
                Err(e) => {
                    // Continue - don't fail completely
                    tracing::warn!("[watcher] failed to watch {}: {e}", dir.display());
                }
            }
        }

        let manifest = project_root.join(&settings.manifest_path);
        if manifest.is_file()
            && let Err(e) = watcher.watch(&manifest, RecursiveMode::NonRecursive)
        {
            tracing::warn!("[watcher] failed to watch {}: {e}", manifest.display());
        }

        Ok(Self {
            scheduler: Scheduler::new(settings.watch.debounce_ms),
            ignore: IgnoreRules::new(&settings.watch.ignore_patterns),
            readme_key: path_key(&settings.readme_path),
            state_key: path_key(&settings.state_path),
            synchronizer,
            event_rx: rx,
            _watcher: watcher,
            project_root,
        })
    }

    /// Run the watch loop until the process is terminated.
    pub async fn watch(mut self) -> SyncResult<()> {
        crate::log_event!("watcher", "started");

        // Initial pass so a fresh checkout gets a current document
        // before the first edit
        let report = self.synchronizer.run_once();
        crate::log_event!(
            "sync",
            "initial pass",
            "{} files, {} symbols",
            report.files_scanned,
            report.symbols_found
        );

        loop {
            let timeout = sleep(Duration::from_millis(POLL_INTERVAL_MS));
            tokio::pin!(timeout);

            tokio::select! {
                // Handle incoming file events
                Some(res) = self.event_rx.recv() => {
                    match res {
                        Ok(event) => self.handle_event(event),
                        Err(e) => tracing::error!("[watcher] file watch error: {e}"),
                    }
                }

                // Process the batch once the tree has been quiet
                _ = &mut timeout => {
                    if let Some(batch) = self.scheduler.take_ready() {
                        let report = self.synchronizer.run_batch(&batch);
                        crate::log_event!(
                            "sync",
                            "processed",
                            "{} changed paths, {} symbols",
                            report.changes_recorded,
                            report.symbols_found
                        );
                    }
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return;
        }

        for path in event.paths {
            if let Some(key) = self.accepts(&path) {
                crate::debug_event!("watcher", "queued", "{key}");
                self.scheduler.record(key);
            }
        }
    }

    /// Decide whether an event path joins the batch, returning its
    /// relative key if so. The target document and the state file are
    /// never queued: writing them would otherwise retrigger the watcher
    /// forever.
    fn accepts(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.project_root).unwrap_or(path);
        let key = path_key(rel);

        if key == self.readme_key || key == self.state_key {
            return None;
        }
        if self.ignore.is_ignored(&key) {
            return None;
        }

        Some(key)
    }
}
