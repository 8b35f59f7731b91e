//! Concatenator
//!
//! Rebuilds the full document strictly from a store's manifest and fragment
//! files. No original document and no in-memory parse state are consulted:
//! this is the proof that the split representation is self-contained. Any
//! fragment the manifest names but the store lacks fails the call, naming the
//! missing file; a truncated document is never returned.

use crate::corpus::error::CorpusError;
use crate::corpus::store::FragmentStore;

/// Reassemble the document by appending every manifest part's fragment, in
/// manifest order.
pub fn concatenate(store: &dyn FragmentStore) -> Result<String, CorpusError> {
    let manifest = store.read_manifest()?;
    let mut output = String::new();
    for part in &manifest.parts {
        output.push_str(&store.read_fragment(part.filename())?);
    }
    Ok(output)
}
