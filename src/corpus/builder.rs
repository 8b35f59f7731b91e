//! Section builder
//!
//! Scans raw lines into a tree of sections. Header markers (`#` runs of
//! length 1-6 followed by whitespace and a title) open sections; the marker
//! count is the nesting level. A header strictly deeper than the open section
//! delegates its whole sub-run to a recursive call; a header at or above the
//! level that scoped the current call closes the frame without consuming the
//! line, so the caller's own loop sees it next. Recursion depth is bounded by
//! the header depth, never by document length.
//!
//! Lines that fail the header grammar are never an error: before any header
//! they are discarded (there is no section to attach them to), after a header
//! they are appended verbatim to that section's content. Nesting is decided
//! by relative level ordering, not contiguity, so a level-3 header directly
//! under a level-1 section is accepted as its child.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::corpus::numbering::extract_section_number;
use crate::corpus::section::{Section, SectionId};

static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

/// Strip the line terminator (`\n` or `\r\n`), keeping other trailing
/// whitespace intact.
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Match a line against the header grammar, yielding (level, title).
fn parse_header(line: &str) -> Option<(usize, &str)> {
    let caps = HEADER_REGEX.captures(strip_terminator(line))?;
    let level = caps.get(1)?.as_str().len();
    let title = caps.get(2)?.as_str().trim();
    Some((level, title))
}

/// Build sections from `lines`, pushing every node into `arena` (parents
/// before children) and returning the ids of the run's top-level sections.
///
/// `lines` is the sub-run being scanned, `start_index` the local index to
/// start from, `parent_level` the level that scopes this call, and
/// `line_offset` the absolute index of `lines[0]` in the document, so every
/// recorded line number is absolute.
pub fn build(
    arena: &mut Vec<Section>,
    lines: &[String],
    start_index: usize,
    parent_level: usize,
    line_offset: usize,
) -> Vec<SectionId> {
    let mut sections = Vec::new();
    let mut current: Option<SectionId> = None;
    let mut i = start_index;

    while i < lines.len() {
        let line = &lines[i];

        if let Some((level, title)) = parse_header(line) {
            // A deeper header starts a subsection run of the open section.
            if let Some(cur) = current {
                if level > arena[cur.0].level {
                    let sub_end = find_section_end(lines, i, level);
                    let subsections =
                        build(arena, &lines[i..sub_end], 0, level, line_offset + i);
                    if let Some(last) = subsections.last() {
                        let last_end = arena[last.0].end_line;
                        arena[cur.0].end_line = last_end;
                    }
                    arena[cur.0].subsections.extend(subsections);
                    i = sub_end;
                    continue;
                }
            }

            // A header at or above the scoping level closes this frame; the
            // caller consumes the line.
            if current.is_some() && level <= parent_level {
                break;
            }

            if let Some(cur) = current.take() {
                arena[cur.0].end_line = line_offset + i - 1;
                sections.push(cur);
            }

            let id = SectionId(arena.len());
            arena.push(Section {
                level,
                title: title.to_string(),
                number: extract_section_number(title),
                raw_header: strip_terminator(line).to_string(),
                content: Vec::new(),
                subsections: Vec::new(),
                start_line: line_offset + i,
                end_line: line_offset + i,
            });
            current = Some(id);
        } else if let Some(cur) = current {
            arena[cur.0]
                .content
                .push(strip_terminator(line).to_string());
        }

        i += 1;
    }

    if let Some(cur) = current {
        arena[cur.0].end_line = line_offset + i - 1;
        sections.push(cur);
    }

    sections
}

/// Find where a section's sub-run ends: the next header at or above `level`,
/// or the end of the lines.
fn find_section_end(lines: &[String], start_index: usize, level: usize) -> usize {
    for (i, line) in lines.iter().enumerate().skip(start_index + 1) {
        if let Some((next_level, _)) = parse_header(line) {
            if next_level <= level {
                return i;
            }
        }
    }
    lines.len()
}
