//! Persisted change-tracking state.
//!
//! Tracks which files have been seen and when, independently of the
//! document's current content. The record outlives any single process
//! invocation: it is loaded at the start of every pass and written back at
//! the end (plain read-modify-write on a JSON file, single-writer
//! assumption).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

/// The persisted record. Unknown keys in the file are ignored on load so
/// older binaries can read state written by newer ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChanges {
    /// Time of the most recent synchronization run.
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,

    /// Relative path -> last-seen-change timestamp, in insertion order.
    /// Entries are never pruned: stale keys for deleted files persist
    /// until cleared by hand.
    #[serde(default)]
    pub files: IndexMap<String, DateTime<Utc>>,

    /// Reserved for forward compatibility; recomputed fresh each run and
    /// never read back.
    #[serde(default)]
    pub functions: Vec<Value>,

    /// Reserved for forward compatibility; recomputed fresh each run and
    /// never read back.
    #[serde(default)]
    pub dependencies: Vec<Value>,
}

impl TrackedChanges {
    /// Stamp `path` as changed now, replacing any prior stamp.
    pub fn record_change(&mut self, path: &str, at: DateTime<Utc>) {
        self.files.insert(path.to_string(), at);
    }

    /// Stamp `path` only if it has never been seen; an existing first-seen
    /// stamp is preserved.
    pub fn mark_seen(&mut self, path: &str, at: DateTime<Utc>) {
        self.files.entry(path.to_string()).or_insert(at);
    }

    /// The last `limit` entries in insertion order (the changelog's
    /// documented ordering).
    pub fn recent(&self, limit: usize) -> Vec<(&String, &DateTime<Utc>)> {
        let skip = self.files.len().saturating_sub(limit);
        self.files.iter().skip(skip).collect()
    }
}

/// Load/save gateway for the tracked-changes file.
#[derive(Debug)]
pub struct ChangeTracker {
    path: PathBuf,
}

impl ChangeTracker {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state, treating a missing file as a fresh record.
    ///
    /// Corrupt state surfaces as a typed error here; `load` is the
    /// logging wrapper callers actually use.
    pub fn try_load(&self) -> SyncResult<TrackedChanges> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TrackedChanges::default()),
            Err(source) => {
                return Err(SyncError::FileRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| SyncError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Load persisted state; any failure is logged and treated as
    /// "no prior state", never fatal.
    pub fn load(&self) -> TrackedChanges {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!("[tracker] could not load previous state: {e}");
            TrackedChanges::default()
        })
    }

    /// Serialize and write the record. The caller decides whether a
    /// failure is worth more than a log line; synchronization must still
    /// update the document even when history tracking fails.
    pub fn save(&self, changes: &TrackedChanges) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(changes).map_err(|source| SyncError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| SyncError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tracker_in(dir: &TempDir) -> ChangeTracker {
        ChangeTracker::new(dir.path().join(".docwatch-changes.json"))
    }

    #[test]
    fn test_load_missing_state_is_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = tracker_in(&temp_dir);

        let changes = tracker.load();
        assert_eq!(changes, TrackedChanges::default());
        assert!(changes.last_update.is_none());
        assert!(changes.files.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = tracker_in(&temp_dir);

        let now = Utc::now();
        let mut changes = TrackedChanges::default();
        changes.record_change("app/page.tsx", now);
        changes.record_change("lib/data.ts", now);
        changes.last_update = Some(now);

        tracker.save(&changes).unwrap();
        let loaded = tracker.load();

        assert_eq!(loaded, changes);
        // Insertion order survives the round trip
        let keys: Vec<&String> = loaded.files.keys().collect();
        assert_eq!(keys, vec!["app/page.tsx", "lib/data.ts"]);
    }

    #[test]
    fn test_corrupt_state_is_typed_error_and_degrades_to_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = tracker_in(&temp_dir);
        std::fs::write(tracker.path(), "{ not json").unwrap();

        assert!(matches!(tracker.try_load(), Err(SyncError::Json { .. })));
        assert_eq!(tracker.load(), TrackedChanges::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let tracker = tracker_in(&temp_dir);
        std::fs::write(
            tracker.path(),
            r#"{"lastUpdate": null, "files": {}, "futureField": 42}"#,
        )
        .unwrap();

        assert_eq!(tracker.load(), TrackedChanges::default());
    }

    #[test]
    fn test_mark_seen_preserves_first_stamp() {
        let mut changes = TrackedChanges::default();
        let first = Utc::now();
        let later = first + chrono::Duration::seconds(60);

        changes.mark_seen("a.ts", first);
        changes.mark_seen("a.ts", later);
        assert_eq!(changes.files["a.ts"], first);

        changes.record_change("a.ts", later);
        assert_eq!(changes.files["a.ts"], later);
    }

    #[test]
    fn test_recent_truncates_to_last_inserted() {
        let mut changes = TrackedChanges::default();
        let now = Utc::now();
        for i in 0..15 {
            changes.record_change(&format!("f{i}.ts"), now);
        }

        let recent = changes.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].0, "f5.ts");
        assert_eq!(recent[9].0, "f14.ts");
    }
}
