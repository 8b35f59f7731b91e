//! Section tree nodes
//!
//! Sections live in a flat arena owned by the document; parent/child links are
//! [`SectionId`] indices into that arena. This keeps exactly one owner for all
//! line content and lets entries reference their section without copying it.
//!
//! Line ranges
//!
//!     `start_line` and `end_line` are absolute 0-based indices into the
//!     document's original line buffer, inclusive on both ends. The builder
//!     records provisional end lines while scanning; [`finalize_ranges`] runs
//!     once at parse completion and settles every section's end line
//!     bottom-up, taking the max of the recorded end, the span implied by the
//!     section's own content, and the deepest subsection end. After that pass
//!     the ranges are trusted everywhere (export, split) and never recomputed.

use serde::{Deserialize, Serialize};

/// Index of a section in the document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub usize);

/// A titled, leveled node in the document's header hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header nesting depth, 1-6.
    pub level: usize,
    /// Title text after the header marker, trimmed.
    pub title: String,
    /// Identifier parsed from the title prefix, e.g. "0", "2.1", "P35".
    pub number: Option<String>,
    /// The exact original header line, without its line terminator.
    pub raw_header: String,
    /// Lines belonging directly to this section (subsections excluded), each
    /// with the line terminator stripped but other trailing whitespace kept.
    pub content: Vec<String>,
    /// Child sections, each strictly deeper than this one.
    pub subsections: Vec<SectionId>,
    /// Absolute 0-based index of the header line.
    pub start_line: usize,
    /// Absolute 0-based index of the last line, inclusive.
    pub end_line: usize,
}

impl Section {
    /// The complete title including any number prefix, taken from the header.
    pub fn full_title(&self) -> &str {
        self.raw_header.trim_start_matches('#').trim()
    }

    /// Re-emit this section as lines: header, content, then subsections.
    /// Used by the best-effort rebuilder only; not byte-exact.
    pub fn to_lines(&self, arena: &[Section]) -> Vec<String> {
        let mut lines = vec![self.raw_header.clone()];
        lines.extend(self.content.iter().cloned());
        for id in &self.subsections {
            lines.extend(arena[id.0].to_lines(arena));
        }
        lines
    }
}

/// Settle every section's `end_line` bottom-up.
///
/// The builder always pushes children after their parent, so a reverse index
/// walk visits each subsection before the section that owns it.
pub fn finalize_ranges(arena: &mut [Section]) {
    for i in (0..arena.len()).rev() {
        let mut end = arena[i].end_line;
        let content_end = arena[i].start_line + arena[i].content.len();
        if content_end > end {
            end = content_end;
        }
        for c in 0..arena[i].subsections.len() {
            let child = arena[i].subsections[c].0;
            debug_assert!(child > i);
            if arena[child].end_line > end {
                end = arena[child].end_line;
            }
        }
        arena[i].end_line = end;
    }
}
