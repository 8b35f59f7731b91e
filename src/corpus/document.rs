//! Corpus document
//!
//! The document owns the original line buffer (terminators retained), the
//! section arena, and the entry map. It is constructed once by [`parse`] and
//! never mutated afterwards: the section tree is an index over the buffer,
//! and exact rebuilding replays the buffer itself. Parsing finalizes every
//! section's line range bottom-up, so export and split can trust the ranges
//! without recomputing them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::builder::build;
use crate::corpus::entry::{extract, Entry};
use crate::corpus::error::CorpusError;
use crate::corpus::section::{finalize_ranges, Section, SectionId};

/// Header metadata scraped from the first lines of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// Document statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub total_lines: usize,
    pub total_sections: usize,
    pub top_level_sections: usize,
    pub total_entries: usize,
    /// Entry counts keyed by classifying letter.
    pub entries_by_type: BTreeMap<char, usize>,
}

/// A parsed corpus document. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusDocument {
    pub(crate) lines: Vec<String>,
    pub(crate) arena: Vec<Section>,
    pub(crate) roots: Vec<SectionId>,
    pub(crate) entries: BTreeMap<String, Entry>,
    pub(crate) metadata: DocumentMetadata,
}

/// How many leading lines the metadata scrape looks at.
const METADATA_SCAN_LINES: usize = 20;

impl CorpusDocument {
    /// Parse document text into a structured, range-finalized document.
    ///
    /// Duplicate entry ids are surfaced here; the parse never silently picks
    /// one of the conflicting sections.
    pub fn parse(content: &str) -> Result<Self, CorpusError> {
        let lines: Vec<String> = content.split_inclusive('\n').map(String::from).collect();

        let metadata = parse_metadata(&lines);

        let mut arena = Vec::new();
        let roots = build(&mut arena, &lines, 0, 0, 0);
        finalize_ranges(&mut arena);

        // Arena push order is pre-order: parents before children, siblings in
        // document order.
        let order: Vec<SectionId> = (0..arena.len()).map(SectionId).collect();
        let entries = extract(&arena, &order)?;

        Ok(CorpusDocument {
            lines,
            arena,
            roots,
            entries,
            metadata,
        })
    }

    /// The original line buffer, terminators retained.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Top-level section ids, in document order.
    pub fn roots(&self) -> &[SectionId] {
        &self.roots
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.arena[id.0]
    }

    pub fn arena(&self) -> &[Section] {
        &self.arena
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// The id -> entry map.
    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// All section ids in pre-order.
    pub fn all_sections(&self) -> Vec<SectionId> {
        (0..self.arena.len()).map(SectionId).collect()
    }

    /// Find a section by its number, e.g. "0" or "2.1".
    pub fn section_by_number(&self, number: &str) -> Option<&Section> {
        self.arena
            .iter()
            .find(|s| s.number.as_deref() == Some(number))
    }

    /// Exact rebuild: the literal concatenation of the original lines.
    ///
    /// Guarantees `parse(text)?.rebuild() == text` byte for byte. No
    /// re-derivation from the section tree happens here.
    pub fn rebuild(&self) -> String {
        self.lines.concat()
    }

    /// Best-effort rebuild from the section tree. Not guaranteed
    /// byte-identical (pre-header lines are dropped, terminators normalize
    /// to `\n`); exists for structural sanity checks only.
    pub fn rebuild_from_sections(&self) -> String {
        let mut lines = Vec::new();
        for id in &self.roots {
            lines.extend(self.arena[id.0].to_lines(&self.arena));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// The exact original bytes of one section's full line range.
    pub fn section_content(&self, id: SectionId) -> String {
        let section = &self.arena[id.0];
        self.lines[section.start_line..=section.end_line].concat()
    }

    /// Export a single entry's exact original content, or None if unknown.
    pub fn export_entry(&self, entry_id: &str) -> Option<String> {
        let entry = self.entries.get(entry_id)?;
        Some(self.section_content(entry.section))
    }

    pub fn stats(&self) -> DocumentStats {
        let mut entries_by_type = BTreeMap::new();
        for entry in self.entries.values() {
            *entries_by_type.entry(entry.type_tag).or_insert(0) += 1;
        }
        DocumentStats {
            total_lines: self.lines.len(),
            total_sections: self.arena.len(),
            top_level_sections: self.roots.len(),
            total_entries: self.entries.len(),
            entries_by_type,
        }
    }

    /// List entry ids sorted by classifying letter, then numerically,
    /// optionally filtered by letter.
    pub fn list_entries(&self, type_tag: Option<char>) -> Vec<String> {
        let mut ids: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| type_tag.map_or(true, |t| e.type_tag == t))
            .collect();
        ids.sort_by(|a, b| {
            (a.type_tag, numeric_key(&a.id_number))
                .partial_cmp(&(b.type_tag, numeric_key(&b.id_number)))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ids.into_iter().map(Entry::id).collect()
    }

    /// Find gaps in whole-number entry numbering, per classifying letter.
    /// Dotted ids (like F1.1) are exempt: their numbering is sparse by
    /// nature.
    pub fn missing_entries(&self) -> BTreeMap<char, Vec<String>> {
        let mut whole: BTreeMap<char, Vec<u32>> = BTreeMap::new();
        for entry in self.entries.values() {
            if entry.id_number.contains('.') {
                continue;
            }
            if let Ok(n) = entry.id_number.parse::<u32>() {
                whole.entry(entry.type_tag).or_default().push(n);
            }
        }

        let mut missing = BTreeMap::new();
        for (tag, numbers) in whole {
            let max = match numbers.iter().max() {
                Some(max) => *max,
                None => continue,
            };
            let gaps: Vec<String> = (1..=max)
                .filter(|n| !numbers.contains(n))
                .map(|n| format!("{}{}", tag, n))
                .collect();
            if !gaps.is_empty() {
                missing.insert(tag, gaps);
            }
        }
        missing
    }
}

/// Scrape title/version/date/status markers from the leading lines.
fn parse_metadata(lines: &[String]) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();
    for line in lines.iter().take(METADATA_SCAN_LINES) {
        let line = crate::corpus::builder::strip_terminator(line);
        if line == "# TABLE OF CONTENTS" {
            break;
        }
        if let Some(rest) = line.strip_prefix("# ") {
            if metadata.title.is_none() {
                metadata.title = Some(rest.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix("**Version:**") {
            metadata.version = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("**Date:**") {
            metadata.date = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("**Status:**") {
            metadata.status = Some(rest.trim().to_string());
        }
    }
    metadata
}

/// Sort key for a possibly dotted id number ("35" or "1.1").
fn numeric_key(id_number: &str) -> f64 {
    id_number.parse::<f64>().unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Universal Corpus
**Version:** 2.0
**Date:** 2024-06-01

## 0. FOUNDATIONS
intro text

## P1. Widget
widget body

## C1. Idea
idea body

## P3. Gadget
gadget body

## F1.1 Capture
flow body
";

    #[test]
    fn test_parse_and_exact_rebuild() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.rebuild(), SAMPLE);
    }

    #[test]
    fn test_metadata_scrape() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.metadata().title.as_deref(), Some("Universal Corpus"));
        assert_eq!(doc.metadata().version.as_deref(), Some("2.0"));
        assert_eq!(doc.metadata().date.as_deref(), Some("2024-06-01"));
        assert_eq!(doc.metadata().status, None);
    }

    #[test]
    fn test_section_by_number() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let s = doc.section_by_number("0").unwrap();
        assert_eq!(s.title, "0. FOUNDATIONS");
        assert!(doc.section_by_number("9.9").is_none());
    }

    #[test]
    fn test_export_entry_is_exact() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let exported = doc.export_entry("P1").unwrap();
        assert_eq!(exported, "## P1. Widget\nwidget body\n\n");
        assert!(doc.export_entry("P99").is_none());
    }

    #[test]
    fn test_stats() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let stats = doc.stats();
        assert_eq!(stats.total_lines, SAMPLE.lines().count());
        assert_eq!(stats.top_level_sections, 1);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.entries_by_type[&'P'], 2);
        assert_eq!(stats.entries_by_type[&'C'], 1);
        assert_eq!(stats.entries_by_type[&'F'], 1);
    }

    #[test]
    fn test_list_entries_numeric_order_and_filter() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.list_entries(None), vec!["C1", "F1.1", "P1", "P3"]);
        assert_eq!(doc.list_entries(Some('P')), vec!["P1", "P3"]);
    }

    #[test]
    fn test_missing_entries_reports_gaps() {
        let doc = CorpusDocument::parse(SAMPLE).unwrap();
        let missing = doc.missing_entries();
        assert_eq!(missing[&'P'], vec!["P2"]);
        assert!(!missing.contains_key(&'C'));
        assert!(!missing.contains_key(&'F'));
    }

    #[test]
    fn test_rebuild_from_sections_is_structural() {
        let input = "# A\nbody\n## B\nmore\n";
        let doc = CorpusDocument::parse(input).unwrap();
        assert_eq!(doc.rebuild_from_sections(), input);
    }

    #[test]
    fn test_duplicate_entry_id_fails_parse() {
        let err = CorpusDocument::parse("# D\n## P1. A\n## P1. B\n").unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateEntryId { .. }));
    }

    #[test]
    fn test_empty_document() {
        let doc = CorpusDocument::parse("").unwrap();
        assert_eq!(doc.total_lines(), 0);
        assert!(doc.roots().is_empty());
        assert_eq!(doc.rebuild(), "");
    }
}
