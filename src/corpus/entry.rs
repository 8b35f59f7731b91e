//! Entry extraction
//!
//! An entry is a recognized, uniquely identified sub-unit of the document: a
//! section whose number matches the entry-id grammar (one uppercase
//! classifying letter, digits, optional dotted remainder). Entries are pure
//! views: they hold the section's arena id, never a copy of its content.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::error::{CorpusError, SectionRef};
use crate::corpus::numbering::{parse_entry_id, strip_entry_prefix};
use crate::corpus::section::{Section, SectionId};

/// A recognized entry, backed by a section in the document arena.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Single-letter classifier, e.g. 'P', 'C', 'F'.
    pub type_tag: char,
    /// Numeric (possibly dotted) remainder of the section number.
    pub id_number: String,
    /// Section title with the id prefix stripped.
    pub name: String,
    /// The originating section. A borrow into the arena, not a copy.
    pub section: SectionId,
}

impl Entry {
    /// Document-wide unique key, e.g. "P35", "C1", "F1.1".
    pub fn id(&self) -> String {
        format!("{}{}", self.type_tag, self.id_number)
    }
}

/// Extract entries from the flattened section list, in pre-order.
///
/// A derived id colliding with an already-extracted entry is malformed input:
/// both sections are reported, neither wins.
pub fn extract(
    arena: &[Section],
    order: &[SectionId],
) -> Result<BTreeMap<String, Entry>, CorpusError> {
    let mut entries: BTreeMap<String, Entry> = BTreeMap::new();

    for id in order {
        let section = &arena[id.0];
        let Some(number) = &section.number else {
            continue;
        };
        let Some((type_tag, id_number)) = parse_entry_id(number) else {
            continue;
        };

        let entry = Entry {
            type_tag,
            id_number,
            name: strip_entry_prefix(&section.title),
            section: *id,
        };
        let key = entry.id();

        if let Some(existing) = entries.get(&key) {
            let first_section = &arena[existing.section.0];
            return Err(CorpusError::DuplicateEntryId {
                id: key,
                first: SectionRef {
                    title: first_section.title.clone(),
                    start_line: first_section.start_line,
                },
                second: SectionRef {
                    title: section.title.clone(),
                    start_line: section.start_line,
                },
            });
        }
        entries.insert(key, entry);
    }

    Ok(entries)
}
