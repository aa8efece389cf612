//! Generated-document handling: section merging and content rendering.
//!
//! The target document is treated as an ordered sequence of Markdown
//! sections keyed by heading text. Three headings are machine-owned and
//! fully regenerated each pass, one (the changelog) is machine-maintained;
//! every other heading is human-owned and preserved byte for byte.

mod merge;
mod render;

pub use merge::{
    CHANGELOG_HEADING, DEPENDENCIES_HEADING, STRUCTURE_HEADING, SYMBOLS_HEADING, merge_changelog,
    merge_section,
};
pub use render::{render_changelog, render_dependencies, render_symbols, render_tree};
