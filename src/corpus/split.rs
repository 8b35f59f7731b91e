//! Splitter
//!
//! Partitions the original line buffer into ordered, non-overlapping
//! fragments: one per contiguous run of non-entry lines, one per entry. Each
//! fragment's literal content is written to the store, then the manifest is
//! written last, so a partially written split can never present itself as
//! complete.
//!
//! The scan is an explicit two-state machine over line indices: while lines
//! belong to no entry they accumulate into a pending section run; hitting a
//! line that an entry's range covers flushes the pending run, emits that
//! entry as a single part spanning its full finalized range, and resumes past
//! the range. Entries nested inside another entry's range are covered by the
//! outer part, which keeps the manifest an exact partition of the document.

use serde::{Deserialize, Serialize};

use crate::corpus::document::CorpusDocument;
use crate::corpus::error::CorpusError;
use crate::corpus::store::FragmentStore;

/// Manifest format version.
pub const MANIFEST_VERSION: &str = "1.0";

/// Ordered index of document fragments, sufficient on its own to reconstruct
/// the full document. Written once by the splitter, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub total_lines: usize,
    pub parts: Vec<ManifestPart>,
}

/// One fragment of the document. Ranges are absolute 0-based line indices,
/// inclusive; in manifest order they partition `[0, total_lines)` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestPart {
    /// A contiguous run of non-entry lines.
    Section {
        id: String,
        filename: String,
        start_line: usize,
        end_line: usize,
        lines: usize,
    },
    /// One entry's full line range.
    Entry {
        id: String,
        name: String,
        filename: String,
        start_line: usize,
        end_line: usize,
        lines: usize,
    },
}

impl ManifestPart {
    pub fn id(&self) -> &str {
        match self {
            ManifestPart::Section { id, .. } | ManifestPart::Entry { id, .. } => id,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            ManifestPart::Section { filename, .. } | ManifestPart::Entry { filename, .. } => {
                filename
            }
        }
    }

    pub fn start_line(&self) -> usize {
        match self {
            ManifestPart::Section { start_line, .. } | ManifestPart::Entry { start_line, .. } => {
                *start_line
            }
        }
    }

    pub fn end_line(&self) -> usize {
        match self {
            ManifestPart::Section { end_line, .. } | ManifestPart::Entry { end_line, .. } => {
                *end_line
            }
        }
    }
}

/// Scan state: either between parts or accumulating a section run.
enum RunState {
    Idle,
    SectionRun { start: usize },
}

/// Split a document into fragments plus a manifest, written to `store`.
///
/// Degenerate entry ranges reject the document before anything is written.
pub fn split(
    doc: &CorpusDocument,
    store: &mut dyn FragmentStore,
) -> Result<Manifest, CorpusError> {
    let total = doc.total_lines();

    // Entries in document order, ranges validated up front.
    let mut ordered: Vec<&str> = doc.entries().keys().map(String::as_str).collect();
    ordered.sort_by_key(|id| doc.section(doc.entries()[*id].section).start_line);
    for id in &ordered {
        let section = doc.section(doc.entries()[*id].section);
        if section.end_line < section.start_line || section.end_line >= total {
            return Err(CorpusError::DegenerateRange {
                id: (*id).to_string(),
                start_line: section.start_line,
                end_line: section.end_line,
            });
        }
    }

    // Line -> owning entry. First marker wins, so an entry nested inside
    // another entry's range is absorbed by the outer one.
    let mut line_owner: Vec<Option<usize>> = vec![None; total];
    for (idx, id) in ordered.iter().enumerate() {
        let section = doc.section(doc.entries()[*id].section);
        for owner in &mut line_owner[section.start_line..=section.end_line] {
            if owner.is_none() {
                *owner = Some(idx);
            }
        }
    }

    let mut parts: Vec<ManifestPart> = Vec::new();
    let mut fragments: Vec<(String, String)> = Vec::new();
    let mut part_counter = 0usize;
    let mut state = RunState::Idle;
    let mut i = 0usize;

    let mut flush_section = |start: usize, end: usize, parts: &mut Vec<ManifestPart>, fragments: &mut Vec<(String, String)>| {
        let id = format!("_part_{:04}", part_counter);
        part_counter += 1;
        let filename = format!("{}.md", id);
        fragments.push((filename.clone(), doc.lines()[start..=end].concat()));
        parts.push(ManifestPart::Section {
            id,
            filename,
            start_line: start,
            end_line: end,
            lines: end - start + 1,
        });
    };

    while i < total {
        match line_owner[i] {
            Some(owner) => {
                if let RunState::SectionRun { start } = state {
                    flush_section(start, i - 1, &mut parts, &mut fragments);
                    state = RunState::Idle;
                }

                let id = ordered[owner];
                let entry = &doc.entries()[id];
                let section = doc.section(entry.section);
                let filename = format!("{}_{}.md", id, sanitize_name(&entry.name));
                fragments.push((
                    filename.clone(),
                    doc.lines()[section.start_line..=section.end_line].concat(),
                ));
                parts.push(ManifestPart::Entry {
                    id: id.to_string(),
                    name: entry.name.clone(),
                    filename,
                    start_line: section.start_line,
                    end_line: section.end_line,
                    lines: section.end_line - section.start_line + 1,
                });
                i = section.end_line + 1;
            }
            None => {
                if let RunState::Idle = state {
                    state = RunState::SectionRun { start: i };
                }
                i += 1;
            }
        }
    }
    if let RunState::SectionRun { start } = state {
        flush_section(start, total - 1, &mut parts, &mut fragments);
    }

    // Every fragment exists before the manifest names it.
    for (filename, content) in &fragments {
        store.write_fragment(filename, content)?;
    }
    let manifest = Manifest {
        version: MANIFEST_VERSION.to_string(),
        total_lines: total,
        parts,
    };
    store.write_manifest(&manifest)?;
    Ok(manifest)
}

/// Deterministic filename-safe form of an entry name.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c if c.is_whitespace() => '_',
            c if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::entry::Entry;
    use crate::corpus::section::{Section, SectionId};
    use crate::corpus::store::MemStore;
    use std::collections::BTreeMap;

    const SAMPLE: &str = "\
# Corpus
preamble

## P1. Widget
widget body

## 2. Interlude
plain prose

## F1.1 Capture/Replay
flow body
";

    #[test]
    fn test_split_partitions_document() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();

        assert_eq!(manifest.total_lines, doc.total_lines());

        // Parts cover [0, total_lines) in order, no gaps, no overlaps.
        let mut next = 0;
        for part in &manifest.parts {
            assert_eq!(part.start_line(), next);
            assert!(part.end_line() >= part.start_line());
            next = part.end_line() + 1;
        }
        assert_eq!(next, manifest.total_lines);
    }

    #[test]
    fn test_split_part_kinds_and_names() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();

        let kinds: Vec<&str> = manifest
            .parts
            .iter()
            .map(|p| match p {
                ManifestPart::Section { .. } => "section",
                ManifestPart::Entry { .. } => "entry",
            })
            .collect();
        assert_eq!(kinds, vec!["section", "entry", "section", "entry"]);

        assert_eq!(manifest.parts[0].id(), "_part_0000");
        assert_eq!(manifest.parts[0].filename(), "_part_0000.md");
        assert_eq!(manifest.parts[1].id(), "P1");
        assert_eq!(manifest.parts[1].filename(), "P1_Widget.md");
        // '/' sanitizes to '-' deterministically.
        assert_eq!(manifest.parts[3].filename(), "F1.1_Capture-Replay.md");
    }

    #[test]
    fn test_fragment_contents_are_exact() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();

        for part in &manifest.parts {
            let content = store.read_fragment(part.filename()).unwrap();
            let expected = doc.lines()[part.start_line()..=part.end_line()].concat();
            assert_eq!(content, expected);
        }
    }

    #[test]
    fn test_entry_containing_entry_is_absorbed() {
        let input = "# D\n## F1. Flow\nouter\n### F1.1 Step\ninner\n";
        let doc = CorpusDocument::parse(input).unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();

        // F1.1 sits inside F1's range: one entry part, still a partition.
        let entry_ids: Vec<&str> = manifest
            .parts
            .iter()
            .filter(|p| matches!(p, ManifestPart::Entry { .. }))
            .map(|p| p.id())
            .collect();
        assert_eq!(entry_ids, vec!["F1"]);

        let mut next = 0;
        for part in &manifest.parts {
            assert_eq!(part.start_line(), next);
            next = part.end_line() + 1;
        }
        assert_eq!(next, manifest.total_lines);
    }

    #[test]
    fn test_degenerate_range_rejected_before_writes() {
        let section = Section {
            level: 2,
            title: "P1. Broken".to_string(),
            number: Some("P1".to_string()),
            raw_header: "## P1. Broken".to_string(),
            content: Vec::new(),
            subsections: Vec::new(),
            start_line: 3,
            end_line: 2,
        };
        let mut entries = BTreeMap::new();
        entries.insert(
            "P1".to_string(),
            Entry {
                type_tag: 'P',
                id_number: "1".to_string(),
                name: "Broken".to_string(),
                section: SectionId(0),
            },
        );
        let doc = CorpusDocument {
            lines: vec!["x\n".to_string(); 5],
            arena: vec![section],
            roots: vec![SectionId(0)],
            entries,
            metadata: Default::default(),
        };

        let mut store = MemStore::new();
        let err = split(&doc, &mut store).unwrap_err();
        assert!(matches!(err, CorpusError::DegenerateRange { .. }));
        assert!(store.fragment_names().is_empty());
        assert!(store.read_manifest().is_err());
    }

    #[test]
    fn test_document_without_entries_is_one_part() {
        let doc = CorpusDocument::parse("# A\nprose\n# B\nmore\n").unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();
        assert_eq!(manifest.parts.len(), 1);
        assert!(matches!(manifest.parts[0], ManifestPart::Section { .. }));
        assert_eq!(manifest.parts[0].end_line(), 3);
    }

    #[test]
    fn test_empty_document_has_no_parts() {
        let doc = CorpusDocument::parse("").unwrap();
        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();
        assert!(manifest.parts.is_empty());
        assert_eq!(manifest.total_lines, 0);
    }
}
