//! Round-trip validation
//!
//! Compares two buffers and reports either equivalence or the first
//! divergence point. Divergence is always returned as a [`Comparison`]
//! value, never as an error, so test code can assert on it directly.

use crate::corpus::concat::concatenate;
use crate::corpus::document::CorpusDocument;
use crate::corpus::error::CorpusError;
use crate::corpus::split::split;
use crate::corpus::store::FragmentStore;

/// Outcome of comparing an expected buffer against an actual one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Byte-for-byte identical.
    Equal,
    /// Identical once `\r\n` is normalized to `\n` on both sides.
    EqualModuloLineEndings,
    /// First differing character, with its byte offset in the expected
    /// buffer and a 1-based line number for the test report.
    FirstDivergence {
        byte_offset: usize,
        line_number: usize,
        expected: char,
        actual: char,
    },
    /// One buffer is a prefix of the other.
    LengthMismatch {
        expected_len: usize,
        actual_len: usize,
    },
}

impl Comparison {
    /// True for `Equal` and `EqualModuloLineEndings`.
    pub fn is_equivalent(&self) -> bool {
        matches!(
            self,
            Comparison::Equal | Comparison::EqualModuloLineEndings
        )
    }
}

/// Compare `actual` against `expected`.
///
/// Byte comparison first; on inequality, retried with line endings
/// normalized; failing that, the first differing character is located and
/// reported with its line number.
pub fn compare(expected: &str, actual: &str) -> Comparison {
    if expected == actual {
        return Comparison::Equal;
    }

    if expected.replace("\r\n", "\n") == actual.replace("\r\n", "\n") {
        return Comparison::EqualModuloLineEndings;
    }

    for ((byte_offset, e), a) in expected.char_indices().zip(actual.chars()) {
        if e != a {
            let line_number = expected[..byte_offset].matches('\n').count() + 1;
            return Comparison::FirstDivergence {
                byte_offset,
                line_number,
                expected: e,
                actual: a,
            };
        }
    }

    Comparison::LengthMismatch {
        expected_len: expected.len(),
        actual_len: actual.len(),
    }
}

/// Validate that a parsed document rebuilds to the original content.
pub fn validate_round_trip(original: &str, doc: &CorpusDocument) -> Comparison {
    compare(original, &doc.rebuild())
}

/// Validate that split then concatenate reproduces the document.
///
/// Concatenation reads only what the split wrote to the store, proving the
/// split artifacts are self-contained.
pub fn validate_split_round_trip(
    doc: &CorpusDocument,
    store: &mut dyn FragmentStore,
) -> Result<Comparison, CorpusError> {
    let original = doc.rebuild();
    split(doc, store)?;
    let reconstructed = concatenate(store)?;
    Ok(compare(&original, &reconstructed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::store::MemStore;

    #[test]
    fn test_equal() {
        assert_eq!(compare("# A\nbody\n", "# A\nbody\n"), Comparison::Equal);
    }

    #[test]
    fn test_equal_modulo_line_endings() {
        assert_eq!(
            compare("# A\r\nbody\r\n", "# A\nbody\n"),
            Comparison::EqualModuloLineEndings
        );
        assert!(compare("# A\r\n", "# A\n").is_equivalent());
    }

    #[test]
    fn test_first_divergence_location() {
        let result = compare("# A\nbody\n", "# A\nbOdy\n");
        assert_eq!(
            result,
            Comparison::FirstDivergence {
                byte_offset: 5,
                line_number: 2,
                expected: 'o',
                actual: 'O',
            }
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            compare("# A\nbody\n", "# A\nbody\nextra\n"),
            Comparison::LengthMismatch {
                expected_len: 9,
                actual_len: 15,
            }
        );
    }

    #[test]
    fn test_validate_round_trip() {
        let input = "# A\n## P1. W\nbody\n";
        let doc = CorpusDocument::parse(input).unwrap();
        assert_eq!(validate_round_trip(input, &doc), Comparison::Equal);
    }

    #[test]
    fn test_validate_split_round_trip() {
        let input = "# A\nintro\n## P1. W\nbody\n## C2. X\nmore\n";
        let doc = CorpusDocument::parse(input).unwrap();
        let mut store = MemStore::new();
        let result = validate_split_round_trip(&doc, &mut store).unwrap();
        assert_eq!(result, Comparison::Equal);
    }
}
