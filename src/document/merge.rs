//! Idempotent merging of generated content into a hand-edited document.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::ChangelogMode;

pub const STRUCTURE_HEADING: &str = "## Project Structure";
pub const SYMBOLS_HEADING: &str = "## Key Functions & Components";
pub const DEPENDENCIES_HEADING: &str = "## Dependencies";
pub const CHANGELOG_HEADING: &str = "## Changelog";

/// Insertion points tried in order when a machine-owned heading is absent.
const ANCHOR_HEADINGS: [&str; 2] = ["## Learn More", "## Deploy"];

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    // A line starting a level-1 or level-2 heading. Three or more `#`
    // characters do not terminate a section body.
    HEADING.get_or_init(|| Regex::new(r"(?m)^##?\s").expect("hard-coded heading pattern is valid"))
}

/// Offset of the next heading line in `text`, or `text.len()` if none.
fn next_heading_offset(text: &str) -> usize {
    heading_regex().find(text).map_or(text.len(), |m| m.start())
}

/// Replace (or insert) the body of `heading` with `body`.
///
/// The section body runs from immediately after the first literal
/// occurrence of `heading` to the start of the next `#`/`##` heading line,
/// or to end of document. The replacement is separated from the heading and
/// from the following content by exactly one blank line on each side;
/// everything outside that span is preserved unchanged. Merging the same
/// content twice is a fixed point.
pub fn merge_section(document: &str, heading: &str, body: &str) -> String {
    let body = body.trim();

    match document.find(heading) {
        Some(idx) => {
            let after = &document[idx + heading.len()..];
            let end = next_heading_offset(after);
            format!(
                "{}{}\n\n{}\n\n{}",
                &document[..idx],
                heading,
                body,
                &after[end..]
            )
        }
        None => insert_section(document, heading, body),
    }
}

/// Insert a new heading+body block before the first anchor heading, or at
/// the end of the document if no anchor exists.
fn insert_section(document: &str, heading: &str, body: &str) -> String {
    for anchor in ANCHOR_HEADINGS {
        if let Some(idx) = document.find(anchor) {
            let before = document[..idx].trim_end();
            let rest = &document[idx..];
            if before.is_empty() {
                return format!("{heading}\n\n{body}\n\n{rest}");
            }
            return format!("{before}\n\n{heading}\n\n{body}\n\n{rest}");
        }
    }

    let before = document.trim_end();
    if before.is_empty() {
        format!("{heading}\n\n{body}\n\n")
    } else {
        format!("{before}\n\n{heading}\n\n{body}\n\n")
    }
}

/// Merge the rendered changelog block under the changelog heading.
///
/// `Replace` keeps only the newly generated block (the default: repeated
/// passes with unchanged inputs are idempotent). `Append` inserts the new
/// block directly after the heading and keeps prior content beneath it,
/// which grows the section on every pass.
pub fn merge_changelog(document: &str, block: &str, mode: ChangelogMode) -> String {
    match mode {
        ChangelogMode::Replace => merge_section(document, CHANGELOG_HEADING, block),
        ChangelogMode::Append => {
            let Some(idx) = document.find(CHANGELOG_HEADING) else {
                return merge_section(document, CHANGELOG_HEADING, block);
            };
            let after = &document[idx + CHANGELOG_HEADING.len()..];
            let end = next_heading_offset(after);
            let prior = after[..end].trim();
            let body = if prior.is_empty() {
                block.trim().to_string()
            } else {
                format!("{}\n\n{}", block.trim(), prior)
            };
            format!(
                "{}{}\n\n{}\n\n{}",
                &document[..idx],
                CHANGELOG_HEADING,
                body,
                &after[end..]
            )
        }
    }
}
