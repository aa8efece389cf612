//! Rendering of generated section bodies.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::analysis::{ManifestDeps, SymbolRecord};
use crate::tracker::TrackedChanges;

/// Directory levels rendered before the tree is cut off.
const MAX_TREE_DEPTH: usize = 5;

#[derive(Default)]
struct TreeNode {
    dirs: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

impl TreeNode {
    fn insert(&mut self, parts: &[String]) {
        match parts {
            [] => {}
            [file] => self.files.push(file.clone()),
            [dir, rest @ ..] => self.dirs.entry(dir.clone()).or_default().insert(rest),
        }
    }

    fn format(&self, prefix: &str, depth: usize, out: &mut String) {
        if depth > MAX_TREE_DEPTH {
            return;
        }

        // Directories first, then files, both lexicographic
        let mut files = self.files.clone();
        files.sort();
        let total = self.dirs.len() + files.len();

        for (idx, (name, node)) in self.dirs.iter().enumerate() {
            let last = idx + 1 == total;
            let connector = if last { "└── " } else { "├── " };
            out.push_str(&format!("{prefix}{connector}{name}/\n"));
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            node.format(&child_prefix, depth + 1, out);
        }

        for (idx, name) in files.iter().enumerate() {
            let last = self.dirs.len() + idx + 1 == total;
            let connector = if last { "└── " } else { "├── " };
            out.push_str(&format!("{prefix}{connector}{name}\n"));
        }
    }
}

/// Render the directory tree of classified files as a fenced block.
pub fn render_tree(files: &[PathBuf]) -> String {
    if files.is_empty() {
        return "_No code files found_".to_string();
    }

    let mut root = TreeNode::default();
    for file in files {
        let parts: Vec<String> = file
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        root.insert(&parts);
    }

    let mut out = String::new();
    root.format("", 0, &mut out);
    format!("```\n{out}```")
}

/// Render the symbol index, grouped by declaring file in first-occurrence
/// order.
pub fn render_symbols(functions: &[SymbolRecord]) -> String {
    if functions.is_empty() {
        return "No exported functions detected.".to_string();
    }

    let mut by_file: IndexMap<&str, Vec<&SymbolRecord>> = IndexMap::new();
    for func in functions {
        by_file.entry(func.file.as_str()).or_default().push(func);
    }

    let mut content = String::new();
    for (file, funcs) in &by_file {
        content.push_str(&format!("### {file}\n\n"));
        for func in funcs {
            if func.exported {
                content.push_str(&format!("- `{}()` (exported)\n", func.name));
            } else {
                content.push_str(&format!("- `{}()`\n", func.name));
            }
        }
        content.push('\n');
    }

    content.trim_end().to_string()
}

/// Render the dependency index, split into runtime and development
/// subsections.
pub fn render_dependencies(deps: &ManifestDeps) -> String {
    if deps.is_empty() {
        return "No dependencies found.".to_string();
    }

    let mut content = String::new();

    if !deps.dependencies.is_empty() {
        content.push_str("### Runtime Dependencies\n\n");
        for dep in &deps.dependencies {
            content.push_str(&format!("- `{dep}`\n"));
        }
        content.push('\n');
    }

    if !deps.dev_dependencies.is_empty() {
        content.push_str("### Development Dependencies\n\n");
        for dep in &deps.dev_dependencies {
            content.push_str(&format!("- `{dep}`\n"));
        }
    }

    content.trim_end().to_string()
}

/// Render the changelog block: one bullet per tracked entry (last `limit`,
/// insertion order) and a timestamp footer.
pub fn render_changelog(changes: &TrackedChanges, limit: usize, now: DateTime<Utc>) -> String {
    let recent = changes.recent(limit);

    let body = if recent.is_empty() {
        "No recent changes tracked.".to_string()
    } else {
        recent
            .iter()
            .map(|(path, time)| format!("- {}: Updated `{}`", time.format("%Y-%m-%d"), path))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "### Recent Changes\n\n{body}\n\n_Last updated: {}_",
        now.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn symbol(name: &str, file: &str, exported: bool) -> SymbolRecord {
        SymbolRecord {
            name: name.to_string(),
            file: file.to_string(),
            line: 1,
            exported,
        }
    }

    #[test]
    fn test_tree_directories_before_files() {
        let files = vec![
            PathBuf::from("app/zebra.ts"),
            PathBuf::from("app/api/route.ts"),
            PathBuf::from("app/alpha.ts"),
        ];
        let tree = render_tree(&files);

        assert_eq!(
            tree,
            "```\n\
             └── app/\n\
             \u{20}   ├── api/\n\
             \u{20}   │   └── route.ts\n\
             \u{20}   ├── alpha.ts\n\
             \u{20}   └── zebra.ts\n\
             ```"
        );
    }

    #[test]
    fn test_tree_empty() {
        assert_eq!(render_tree(&[]), "_No code files found_");
    }

    #[test]
    fn test_tree_depth_limit() {
        let file = PathBuf::from("a/b/c/d/e/f/g/deep.ts");
        let tree = render_tree(&[file]);

        assert!(tree.contains("f/"));
        assert!(!tree.contains("deep.ts"));
    }

    #[test]
    fn test_symbols_grouped_by_file() {
        let functions = vec![
            symbol("GET", "app/api/route.ts", true),
            symbol("helper", "app/api/route.ts", false),
            symbol("Page", "app/page.tsx", true),
        ];

        let rendered = render_symbols(&functions);
        assert_eq!(
            rendered,
            "### app/api/route.ts\n\n\
             - `GET()` (exported)\n\
             - `helper()`\n\n\
             ### app/page.tsx\n\n\
             - `Page()` (exported)"
        );
    }

    #[test]
    fn test_symbols_empty() {
        assert_eq!(render_symbols(&[]), "No exported functions detected.");
    }

    #[test]
    fn test_dependencies_subsections() {
        let deps = ManifestDeps {
            dependencies: vec!["zod".to_string(), "next".to_string()],
            dev_dependencies: vec!["typescript".to_string()],
        };

        let rendered = render_dependencies(&deps);
        assert_eq!(
            rendered,
            "### Runtime Dependencies\n\n\
             - `zod`\n\
             - `next`\n\n\
             ### Development Dependencies\n\n\
             - `typescript`"
        );
    }

    #[test]
    fn test_dependencies_runtime_only() {
        let deps = ManifestDeps {
            dependencies: vec!["zod".to_string()],
            dev_dependencies: vec![],
        };
        let rendered = render_dependencies(&deps);
        assert!(rendered.starts_with("### Runtime Dependencies"));
        assert!(!rendered.contains("Development"));
    }

    #[test]
    fn test_dependencies_empty() {
        assert_eq!(
            render_dependencies(&ManifestDeps::default()),
            "No dependencies found."
        );
    }

    #[test]
    fn test_changelog_lists_last_entries_with_footer() {
        let at = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let mut changes = TrackedChanges::default();
        changes.record_change("app/page.tsx", at);
        changes.record_change("lib/data.ts", at);

        let block = render_changelog(&changes, 10, at);
        assert_eq!(
            block,
            "### Recent Changes\n\n\
             - 2026-08-07: Updated `app/page.tsx`\n\
             - 2026-08-07: Updated `lib/data.ts`\n\n\
             _Last updated: 2026-08-07_"
        );
    }

    #[test]
    fn test_changelog_placeholder_when_empty() {
        let at = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let block = render_changelog(&TrackedChanges::default(), 10, at);
        assert_eq!(
            block,
            "### Recent Changes\n\nNo recent changes tracked.\n\n_Last updated: 2026-08-07_"
        );
    }
}
