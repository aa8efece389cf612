//! Best-effort symbol extraction from source text.
//!
//! This is deliberately not a parser. A fixed, ordered list of surface
//! patterns catches the common exported declaration forms; anything the
//! patterns miss stays missing. The contract is best-effort symbol
//! discovery for a generated document, not completeness against every
//! syntactic form.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One extracted top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: String,
    /// Declaring file, relative to the project root.
    pub file: String,
    /// 1-based line of the first match.
    pub line: usize,
    pub exported: bool,
}

/// Per-file analysis result. Recomputed every pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    pub path: String,
    pub functions: Vec<SymbolRecord>,
    /// Module references in first-occurrence order, deduplicated.
    pub imports: Vec<String>,
    pub size: usize,
    pub lines: usize,
}

/// Pattern-based extractor for exported symbols and import targets.
pub struct SymbolExtractor {
    /// Declaration patterns in priority order, with their export flag.
    /// The first pattern that matches a name wins; later matches for the
    /// same name in the same file are discarded.
    patterns: Vec<(Regex, bool)>,
    import_pattern: Regex,
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("hard-coded extraction pattern is valid")
}

impl SymbolExtractor {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                (pattern(r"(?m)^export\s+(?:async\s+)?function\s+(\w+)"), true),
                (
                    pattern(r"(?m)^export\s+default\s+(?:async\s+)?function\s+(\w+)"),
                    true,
                ),
                (pattern(r"(?m)^export\s+(?:async\s+)?const\s+(\w+)\s*="), true),
                (pattern(r"(?m)^const\s+(\w+)\s*=\s*(?:async\s+)?\("), false),
                (pattern(r"(?m)^function\s+(\w+)"), false),
            ],
            import_pattern: pattern(r#"(?m)^import\s+(?:[^'"\n]+?\s+from\s+)?['"]([^'"\n]+)['"]"#),
        }
    }

    /// Extract declarations from raw file text, deduplicated by name.
    pub fn extract_symbols(&self, file: &str, text: &str) -> Vec<SymbolRecord> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut symbols = Vec::new();

        for (regex, exported) in &self.patterns {
            for caps in regex.captures_iter(text) {
                let Some(name) = caps.get(1) else { continue };
                if !seen.insert(name.as_str()) {
                    continue;
                }
                let start = caps.get(0).map_or(0, |m| m.start());
                symbols.push(SymbolRecord {
                    name: name.as_str().to_string(),
                    file: file.to_string(),
                    line: text[..start].matches('\n').count() + 1,
                    exported: *exported,
                });
            }
        }

        symbols
    }

    /// Extract module references, deduplicated in first-occurrence order.
    pub fn extract_imports(&self, text: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.import_pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter(|target| seen.insert(target.as_str()))
            .map(|target| target.as_str().to_string())
            .collect()
    }

    /// Analyze one file on disk.
    ///
    /// Returns `None` for files with an ineligible extension or files that
    /// cannot be read; callers skip those, a single bad file never aborts
    /// a batch.
    pub fn analyze_file(
        &self,
        path: &Path,
        relative: &str,
        extensions: &HashSet<String>,
    ) -> Option<FileAnalysis> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if !extensions.contains(ext) {
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("[extractor] cannot read {}: {e}", path.display());
                return None;
            }
        };

        Some(FileAnalysis {
            path: relative.to_string(),
            functions: self.extract_symbols(relative, &content),
            imports: self.extract_imports(&content),
            size: content.len(),
            lines: content.split('\n').count(),
        })
    }
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_route_handler() {
        let extractor = SymbolExtractor::new();
        let symbols = extractor.extract_symbols("app/api/foo.ts", "export async function GET() {}");

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "GET");
        assert_eq!(symbols[0].line, 1);
        assert!(symbols[0].exported);
        assert_eq!(symbols[0].file, "app/api/foo.ts");
    }

    #[test]
    fn test_dedup_prefers_higher_priority_pattern() {
        let extractor = SymbolExtractor::new();
        // Bare declaration first in the text, exported declaration later:
        // the exported pattern has higher priority and must win.
        let text = "function fetchData() {}\nexport function fetchData() {}\n";
        let symbols = extractor.extract_symbols("lib/data.ts", text);

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "fetchData");
        assert!(symbols[0].exported);
        assert_eq!(symbols[0].line, 2);
    }

    #[test]
    fn test_declaration_forms() {
        let extractor = SymbolExtractor::new();
        let text = "\
export default async function Page() {}
export const revalidate = 60;
const helper = async (input) => input;
function internal() {}
";
        let symbols = extractor.extract_symbols("app/page.tsx", text);

        let names: Vec<(&str, bool)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.exported))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Page", true),
                ("revalidate", true),
                ("helper", false),
                ("internal", false),
            ]
        );
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let extractor = SymbolExtractor::new();
        let text = "// header\n\nexport function second() {}\n";
        let symbols = extractor.extract_symbols("lib/x.ts", text);

        assert_eq!(symbols[0].line, 3);
    }

    #[test]
    fn test_indented_declarations_are_not_top_level() {
        let extractor = SymbolExtractor::new();
        let text = "  export function indented() {}\n";
        assert!(extractor.extract_symbols("lib/x.ts", text).is_empty());
    }

    #[test]
    fn test_imports_dedup_first_occurrence_order() {
        let extractor = SymbolExtractor::new();
        let text = "\
import { Inter } from 'next/font/google';
import './globals.css';
import { clsx } from \"clsx\";
import { Roboto } from 'next/font/google';
";
        let imports = extractor.extract_imports(text);
        assert_eq!(imports, vec!["next/font/google", "./globals.css", "clsx"]);
    }

    #[test]
    fn test_analyze_file_skips_other_extensions() {
        let extractor = SymbolExtractor::new();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let css = temp_dir.path().join("styles.css");
        std::fs::write(&css, "body {}").unwrap();

        let extensions: HashSet<String> = ["ts".to_string()].into_iter().collect();
        assert!(
            extractor
                .analyze_file(&css, "styles.css", &extensions)
                .is_none()
        );
    }

    #[test]
    fn test_analyze_file_counts() {
        let extractor = SymbolExtractor::new();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file = temp_dir.path().join("util.ts");
        let content = "export const a = 1;\nexport const b = 2;\n";
        std::fs::write(&file, content).unwrap();

        let extensions: HashSet<String> = ["ts".to_string()].into_iter().collect();
        let analysis = extractor
            .analyze_file(&file, "util.ts", &extensions)
            .unwrap();

        assert_eq!(analysis.path, "util.ts");
        assert_eq!(analysis.size, content.len());
        assert_eq!(analysis.lines, 3);
        assert_eq!(analysis.functions.len(), 2);
    }
}
