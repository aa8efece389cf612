//! Debounce scheduling for file change events.
//!
//! Debouncing prevents a storm of synchronization passes when files are
//! saved in quick succession (auto-save, formatters, branch switches).
//! Unlike a per-file debounce, the whole batch waits: any new event resets
//! the quiet timer, so a burst of N events collapses into exactly one pass
//! once the tree has been quiet for the configured duration.

use indexmap::IndexSet;
use std::time::{Duration, Instant};

/// Owned debounce state: pending paths plus the time of the last event.
#[derive(Debug)]
pub struct Scheduler {
    /// Queued relative paths, deduplicated, in arrival order.
    pending: IndexSet<String>,
    /// When the most recent event arrived.
    last_event: Option<Instant>,
    /// How long the tree must be quiet before the batch is released.
    quiet: Duration,
}

impl Scheduler {
    /// Create a new scheduler with the given quiet period in milliseconds.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: IndexSet::new(),
            last_event: None,
            quiet: Duration::from_millis(debounce_ms),
        }
    }

    /// Record a change event.
    ///
    /// Resets the quiet timer for the whole batch.
    pub fn record(&mut self, path: String) {
        self.pending.insert(path);
        self.last_event = Some(Instant::now());
    }

    /// Take the whole batch if the quiet period has elapsed since the last
    /// event, or `None` if events are still arriving (or nothing is queued).
    pub fn take_ready(&mut self) -> Option<Vec<String>> {
        let quiet_elapsed = self
            .last_event
            .is_some_and(|at| at.elapsed() >= self.quiet);
        if !quiet_elapsed || self.pending.is_empty() {
            return None;
        }

        self.last_event = None;
        Some(self.pending.drain(..).collect())
    }

    /// Check if there are any pending changes.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Get the number of pending changes.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
