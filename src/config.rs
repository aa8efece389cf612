//! Configuration for the README synchronization engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`docwatch.toml` at the project root)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCWATCH_` and use double
//! underscores to separate nested levels:
//! - `DOCWATCH_WATCH__DEBOUNCE_MS=500` sets `watch.debounce_ms`
//! - `DOCWATCH_CHANGELOG__MODE=append` sets `changelog.mode`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up at the project root.
pub const CONFIG_FILE: &str = "docwatch.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Project root directory (where docwatch.toml is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Target document, relative to the project root
    #[serde(default = "default_readme_path")]
    pub readme_path: PathBuf,

    /// Persisted change-tracking state, relative to the project root
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Dependency manifest, relative to the project root
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// File watching and classification configuration
    #[serde(default)]
    pub watch: WatchConfig,

    /// Changelog section configuration
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// Root directories scanned and watched, relative to the project root
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// File extensions eligible for analysis (no leading dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns excluded from classification and watching.
    /// `*` matches within a path component, `**` matches across components.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Quiet period before a burst of events collapses into one pass
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChangelogConfig {
    /// How the generated block interacts with prior changelog content
    #[serde(default)]
    pub mode: ChangelogMode,

    /// Number of tracked entries shown in the changelog
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// Merge semantics for the changelog section.
///
/// `Replace` keeps only the most recent generated block, making repeated
/// passes idempotent. `Append` preserves prior blocks under the heading,
/// matching the accumulate behavior of early versions of this tool.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangelogMode {
    #[default]
    Replace,
    Append,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default log level filter (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides, e.g. `watcher = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_readme_path() -> PathBuf {
    PathBuf::from("README.md")
}
fn default_state_path() -> PathBuf {
    PathBuf::from(".docwatch-changes.json")
}
fn default_manifest_path() -> PathBuf {
    PathBuf::from("package.json")
}
fn default_roots() -> Vec<String> {
    vec!["app".to_string(), "lib".to_string(), "scripts".to_string()]
}
fn default_extensions() -> Vec<String> {
    vec![
        "ts".to_string(),
        "tsx".to_string(),
        "js".to_string(),
        "jsx".to_string(),
    ]
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/.git/**".to_string(),
        "**/.next/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
        "**/*.log".to_string(),
        "**/.docwatch-changes.json".to_string(),
        "**/package-lock.json".to_string(),
        "**/pnpm-lock.yaml".to_string(),
        "**/tsconfig.tsbuildinfo".to_string(),
    ]
}
fn default_debounce_ms() -> u64 {
    2000
}
fn default_max_entries() -> usize {
    10
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            project_root: None,
            readme_path: default_readme_path(),
            state_path: default_state_path(),
            manifest_path: default_manifest_path(),
            watch: WatchConfig::default(),
            changelog: ChangelogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            mode: ChangelogMode::default(),
            max_entries: default_max_entries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path =
            Self::find_workspace_config().unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with DOCWATCH_ prefix.
            // Double underscore separates nested levels.
            .merge(
                Env::prefixed("DOCWATCH_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.project_root.is_none() {
                    settings.project_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(
                Env::prefixed("DOCWATCH_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(Box::new)
    }

    /// Find the configuration file by searching from the current directory
    /// up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_path = ancestor.join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        None
    }

    /// Get the project root directory (where docwatch.toml is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            if ancestor.join(CONFIG_FILE).is_file() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Resolved project root, falling back to the current directory
    pub fn root(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute path of the target document
    pub fn readme_file(&self) -> PathBuf {
        self.root().join(&self.readme_path)
    }

    /// Absolute path of the persisted tracking state
    pub fn state_file(&self) -> PathBuf {
        self.root().join(&self.state_path)
    }

    /// Absolute path of the dependency manifest
    pub fn manifest_file(&self) -> PathBuf {
        self.root().join(&self.manifest_path)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, toml_string)
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, std::io::Error> {
        let config_path = PathBuf::from(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "Configuration file already exists. Use --force to overwrite",
            ));
        }

        let mut settings = Settings::default();
        if let Ok(current_dir) = std::env::current_dir() {
            settings.project_root = Some(current_dir);
        }

        settings.save(&config_path)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.readme_path, PathBuf::from("README.md"));
        assert_eq!(settings.watch.debounce_ms, 2000);
        assert_eq!(settings.changelog.mode, ChangelogMode::Replace);
        assert_eq!(settings.changelog.max_entries, 10);
        assert!(
            settings
                .watch
                .ignore_patterns
                .iter()
                .any(|p| p.contains("node_modules"))
        );
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docwatch.toml");

        let toml_content = r#"
version = 2
readme_path = "DOCS.md"

[watch]
roots = ["src"]
debounce_ms = 250
ignore_patterns = ["custom/**"]

[changelog]
mode = "append"
max_entries = 5
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.readme_path, PathBuf::from("DOCS.md"));
        assert_eq!(settings.watch.roots, vec!["src"]);
        assert_eq!(settings.watch.debounce_ms, 250);
        // Default ignore patterns should be replaced by custom ones
        assert_eq!(settings.watch.ignore_patterns, vec!["custom/**"]);
        assert_eq!(settings.changelog.mode, ChangelogMode::Append);
        assert_eq!(settings.changelog.max_entries, 5);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docwatch.toml");

        let toml_content = r#"
[watch]
debounce_ms = 100
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();

        // Modified value
        assert_eq!(settings.watch.debounce_ms, 100);

        // Default values should still be present
        assert_eq!(settings.version, 1);
        assert_eq!(settings.watch.roots, vec!["app", "lib", "scripts"]);
        assert!(!settings.watch.ignore_patterns.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docwatch.toml");

        let mut settings = Settings::default();
        settings.watch.debounce_ms = 750;
        settings.changelog.max_entries = 3;

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.watch.debounce_ms, 750);
        assert_eq!(loaded.changelog.max_entries, 3);
    }
}
