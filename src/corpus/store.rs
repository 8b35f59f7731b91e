//! Fragment storage
//!
//! The splitter writes one artifact per fragment plus a manifest; the
//! concatenator reads them back. [`FragmentStore`] is the seam between the
//! two and the storage medium: [`DirStore`] keeps one file per fragment in a
//! directory with the manifest as `_manifest.json`, [`MemStore`] keeps
//! everything in memory for tests.
//!
//! A missing fragment or manifest is reported with its name; it is fatal for
//! the read that needed it.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::corpus::error::CorpusError;
use crate::corpus::split::Manifest;

/// Name of the manifest artifact in every store.
pub const MANIFEST_NAME: &str = "_manifest.json";

/// Storage for split fragments and their manifest.
pub trait FragmentStore {
    fn write_fragment(&mut self, name: &str, content: &str) -> Result<(), CorpusError>;

    /// Read a fragment in full. `MissingFragment` if it does not exist.
    fn read_fragment(&self, name: &str) -> Result<String, CorpusError>;

    fn write_manifest(&mut self, manifest: &Manifest) -> Result<(), CorpusError>;

    /// Read and decode the manifest. `MissingManifest` if it does not exist.
    fn read_manifest(&self) -> Result<Manifest, CorpusError>;
}

/// Directory-backed store: one file per fragment.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CorpusError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CorpusError::Io(e.to_string()))?;
        Ok(DirStore { root })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl FragmentStore for DirStore {
    fn write_fragment(&mut self, name: &str, content: &str) -> Result<(), CorpusError> {
        fs::write(self.root.join(name), content).map_err(|e| CorpusError::Io(e.to_string()))
    }

    fn read_fragment(&self, name: &str) -> Result<String, CorpusError> {
        let path = self.root.join(name);
        if !path.exists() {
            return Err(CorpusError::MissingFragment(name.to_string()));
        }
        fs::read_to_string(path).map_err(|e| CorpusError::Io(e.to_string()))
    }

    fn write_manifest(&mut self, manifest: &Manifest) -> Result<(), CorpusError> {
        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| CorpusError::InvalidManifest(e.to_string()))?;
        fs::write(self.root.join(MANIFEST_NAME), json).map_err(|e| CorpusError::Io(e.to_string()))
    }

    fn read_manifest(&self) -> Result<Manifest, CorpusError> {
        let path = self.root.join(MANIFEST_NAME);
        if !path.exists() {
            return Err(CorpusError::MissingManifest(MANIFEST_NAME.to_string()));
        }
        let json = fs::read_to_string(path).map_err(|e| CorpusError::Io(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| CorpusError::InvalidManifest(e.to_string()))
    }
}

/// In-memory store for tests and transient splits.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    fragments: BTreeMap<String, String>,
    manifest: Option<Manifest>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    /// Drop a fragment, simulating a damaged store.
    pub fn remove_fragment(&mut self, name: &str) -> Option<String> {
        self.fragments.remove(name)
    }

    pub fn fragment_names(&self) -> Vec<&str> {
        self.fragments.keys().map(String::as_str).collect()
    }
}

impl FragmentStore for MemStore {
    fn write_fragment(&mut self, name: &str, content: &str) -> Result<(), CorpusError> {
        self.fragments.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn read_fragment(&self, name: &str) -> Result<String, CorpusError> {
        self.fragments
            .get(name)
            .cloned()
            .ok_or_else(|| CorpusError::MissingFragment(name.to_string()))
    }

    fn write_manifest(&mut self, manifest: &Manifest) -> Result<(), CorpusError> {
        self.manifest = Some(manifest.clone());
        Ok(())
    }

    fn read_manifest(&self) -> Result<Manifest, CorpusError> {
        self.manifest
            .clone()
            .ok_or_else(|| CorpusError::MissingManifest(MANIFEST_NAME.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_missing_fragment() {
        let store = MemStore::new();
        match store.read_fragment("nope.md") {
            Err(CorpusError::MissingFragment(name)) => assert_eq!(name, "nope.md"),
            other => panic!("expected MissingFragment, got {:?}", other),
        }
    }

    #[test]
    fn test_mem_store_missing_manifest() {
        let store = MemStore::new();
        assert!(matches!(
            store.read_manifest(),
            Err(CorpusError::MissingManifest(_))
        ));
    }

    #[test]
    fn test_mem_store_round_trips_fragment() {
        let mut store = MemStore::new();
        store.write_fragment("a.md", "alpha\n").unwrap();
        assert_eq!(store.read_fragment("a.md").unwrap(), "alpha\n");
    }
}
