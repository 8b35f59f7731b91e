//! Property-based tests for the two round-trip invariants.
//!
//! Documents are generated from a small line alphabet (blank lines, prose,
//! headers at several levels, entry headers). Entry numbers come from the
//! line index, so generated ids never collide and every document parses.

use proptest::prelude::*;

use corpus::corpus::{concatenate, split, CorpusDocument, MemStore};

fn render_line(code: u8, index: usize) -> String {
    match code % 6 {
        0 => String::new(),
        1 => format!("prose line {} with content", index),
        2 => format!("# Part {}", index),
        3 => format!("## {}. Topic", index),
        4 => format!("## P{}. Entry {}", index, index),
        _ => format!("### F{}.1 Step {}", index, index),
    }
}

fn render_document(codes: &[u8], trailing_newline: bool) -> String {
    let mut text = codes
        .iter()
        .enumerate()
        .map(|(i, c)| render_line(*c, i))
        .collect::<Vec<_>>()
        .join("\n");
    if trailing_newline && !text.is_empty() {
        text.push('\n');
    }
    text
}

proptest! {
    #[test]
    fn prop_exact_round_trip(
        codes in prop::collection::vec(0u8..6, 0..60),
        trailing_newline in any::<bool>(),
    ) {
        let text = render_document(&codes, trailing_newline);
        let doc = CorpusDocument::parse(&text).unwrap();
        prop_assert_eq!(doc.rebuild(), text);
    }

    #[test]
    fn prop_split_concatenate_round_trip(
        codes in prop::collection::vec(0u8..6, 0..60),
        trailing_newline in any::<bool>(),
    ) {
        let text = render_document(&codes, trailing_newline);
        let doc = CorpusDocument::parse(&text).unwrap();

        let mut store = MemStore::new();
        let manifest = split(&doc, &mut store).unwrap();

        // Manifest parts partition [0, total_lines) in order.
        let mut next = 0;
        for part in &manifest.parts {
            prop_assert_eq!(part.start_line(), next);
            prop_assert!(part.end_line() >= part.start_line());
            next = part.end_line() + 1;
        }
        prop_assert_eq!(next, manifest.total_lines);

        prop_assert_eq!(concatenate(&store).unwrap(), text);
    }

    #[test]
    fn prop_nesting_invariant(
        codes in prop::collection::vec(0u8..6, 0..60),
    ) {
        let text = render_document(&codes, true);
        let doc = CorpusDocument::parse(&text).unwrap();

        for id in doc.all_sections() {
            let parent = doc.section(id);
            for child_id in &parent.subsections {
                let child = doc.section(*child_id);
                prop_assert!(child.level > parent.level);
                prop_assert!(child.start_line >= parent.start_line);
                prop_assert!(child.end_line <= parent.end_line);
            }
        }
    }
}
