//! Corpus document engine
//!
//! This module orchestrates the full decomposition/reconstruction pipeline for
//! corpus documents.
//!
//! Structure:
//!     Raw text is split into lines (terminators retained) and scanned into a
//!     tree of [`Section`] nodes keyed by header markers. Sections whose
//!     numbering matches the entry-identifier grammar become [`Entry`] records
//!     that reference their section by arena index rather than copying it.
//!
//! The pipeline consists of:
//! 1. Section building from raw lines ./corpus/builder.rs
//! 2. Entry extraction over the flattened tree ./corpus/entry.rs
//! 3. Exact and best-effort rebuilding ./corpus/document.rs
//! 4. Split into fragments + manifest, and manifest-driven reassembly
//!    ./corpus/split.rs, ./corpus/concat.rs
//! 5. Round-trip comparison ./corpus/validate.rs
//!
//! Fidelity
//!
//!     The section tree is purely an index over the original line buffer.
//!     Exact rebuilding replays that buffer, so parsing can never lose or
//!     reorder a byte. The splitter also reads the raw buffer, and the
//!     concatenator reads only previously written fragments plus the
//!     manifest, which makes the split representation self-contained.

pub mod builder;
pub mod concat;
pub mod document;
pub mod entry;
pub mod error;
pub mod numbering;
pub mod section;
pub mod split;
pub mod store;
pub mod validate;

pub use concat::concatenate;
pub use document::{CorpusDocument, DocumentMetadata, DocumentStats};
pub use entry::Entry;
pub use error::{CorpusError, SectionRef};
pub use section::{Section, SectionId};
pub use split::{split, Manifest, ManifestPart};
pub use store::{DirStore, FragmentStore, MemStore, MANIFEST_NAME};
pub use validate::{compare, validate_round_trip, validate_split_round_trip, Comparison};
