//! # corpus
//!
//! A parser, splitter, and rebuilder for hierarchical corpus documents.
//!
//! The crate parses a structured text document into a tree of titled sections,
//! extracts identified entries (like `P35` or `F1.1`) from that tree, and can
//! reproduce the original document byte for byte, either directly or through a
//! split/concatenate cycle over independently stored fragments.

pub mod corpus;
