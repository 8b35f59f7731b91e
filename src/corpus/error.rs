//! Error taxonomy for the corpus engine
//!
//! Every failure here is deterministic for a given input, so nothing retries.
//! Unparseable header lines are not an error at all: they are treated as plain
//! content by the builder. Round-trip divergence is likewise not an error; it
//! is reported as a [`Comparison`](crate::corpus::validate::Comparison) value
//! so callers can assert on it directly.

use std::fmt;

/// Location of a section, used when an error needs to name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    /// Title text of the section header.
    pub title: String,
    /// Absolute 0-based line index of the header line.
    pub start_line: usize,
}

/// Errors that can occur while parsing, splitting, or concatenating.
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusError {
    /// Two sections resolved to the same entry id. Both are named; the parse
    /// never silently picks one.
    DuplicateEntryId {
        id: String,
        first: SectionRef,
        second: SectionRef,
    },
    /// Concatenation found no manifest in the store.
    MissingManifest(String),
    /// The manifest names a fragment that does not exist in the store.
    MissingFragment(String),
    /// An entry's computed line span is empty or inverted. Fatal for split,
    /// reported before any fragment is written.
    DegenerateRange {
        id: String,
        start_line: usize,
        end_line: usize,
    },
    /// The manifest artifact exists but could not be decoded.
    InvalidManifest(String),
    /// Underlying store I/O failure.
    Io(String),
}

impl std::error::Error for CorpusError {}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::DuplicateEntryId { id, first, second } => write!(
                f,
                "Duplicate entry id {}: '{}' (line {}) and '{}' (line {})",
                id, first.title, first.start_line, second.title, second.start_line
            ),
            CorpusError::MissingManifest(name) => write!(f, "No manifest found: {}", name),
            CorpusError::MissingFragment(name) => write!(f, "Missing fragment file: {}", name),
            CorpusError::DegenerateRange {
                id,
                start_line,
                end_line,
            } => write!(
                f,
                "Degenerate line range for entry {}: start={}, end={}",
                id, start_line, end_line
            ),
            CorpusError::InvalidManifest(msg) => write!(f, "Invalid manifest: {}", msg),
            CorpusError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}
