//! File system walker for discovering source files to analyze.
//!
//! Classification is a pure filter: configured roots are walked recursively,
//! files with an eligible extension are kept, and anything matching an
//! ignore glob is dropped. Roots that do not exist and directories that
//! cannot be read are skipped silently; this is a best-effort documentation
//! tool and must never fail a pass over a permission error.

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::path_key;
use crate::config::Settings;
use crate::error::{SyncError, SyncResult};

/// Glob-style exclusion rules.
///
/// `*` matches any run of non-separator characters, `**` matches any run of
/// characters including separators. Candidates are tested both with and
/// without a leading separator so patterns anchor the same way in either
/// form.
#[derive(Debug)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl IgnoreRules {
    /// Compile a pattern list. Invalid patterns are logged and skipped
    /// rather than failing the whole rule set.
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| match Self::compile(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!("[classifier] {e}");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    fn compile(pattern: &str) -> SyncResult<Pattern> {
        Pattern::new(pattern).map_err(|source| SyncError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
    }

    /// Check a relative path (forward-slash form) against the rules.
    pub fn is_ignored(&self, relative: &str) -> bool {
        let anchored = format!("/{relative}");
        self.patterns.iter().any(|pattern| {
            pattern.matches_with(relative, MATCH_OPTIONS)
                || pattern.matches_with(&anchored, MATCH_OPTIONS)
        })
    }
}

/// Walks configured roots to find source files eligible for analysis.
pub struct FileClassifier {
    project_root: PathBuf,
    roots: Vec<String>,
    extensions: HashSet<String>,
    ignore: IgnoreRules,
}

impl FileClassifier {
    pub fn new(
        project_root: PathBuf,
        roots: Vec<String>,
        extensions: Vec<String>,
        ignore_patterns: &[String],
    ) -> Self {
        Self {
            project_root,
            roots,
            extensions: extensions.into_iter().collect(),
            ignore: IgnoreRules::new(ignore_patterns),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.root(),
            settings.watch.roots.clone(),
            settings.watch.extensions.clone(),
            &settings.watch.ignore_patterns,
        )
    }

    /// Walk all roots and return eligible files, relative to the project
    /// root and sorted for deterministic output.
    pub fn classify(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for root in &self.roots {
            let dir = self.project_root.join(root);
            if !dir.is_dir() {
                tracing::debug!("[classifier] skipping missing root {}", dir.display());
                continue;
            }

            let mut builder = WalkBuilder::new(&dir);
            // Ignore globs are this tool's own contract; gitignore and
            // hidden-file filtering stay out of the picture.
            builder.standard_filters(false).follow_links(false);

            for entry in builder.build().filter_map(Result::ok) {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(&self.project_root) else {
                    continue;
                };
                let key = path_key(rel);
                if self.ignore.is_ignored(&key) {
                    continue;
                }
                if self.matches_extension(entry.path()) {
                    files.push(rel.to_path_buf());
                }
            }
        }

        files.sort();
        files
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }
}
