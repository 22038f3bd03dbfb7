//! Storage for the last processed commit of one watched repository.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Loads and saves a single commit hash.
pub trait PointerStore {
    /// The stored hash, or `None` when nothing was recorded yet.
    fn load(&self) -> Result<Option<String>>;

    fn save(&mut self, hash: &str) -> Result<()>;
}

/// Pointer kept as a flat text file holding just the hash.
#[derive(Debug, Clone)]
pub struct FilePointerStore {
    path: PathBuf,
}

impl FilePointerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointerStore for FilePointerStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read commit pointer {}", self.path.display()))?;
        let hash = text.trim();
        Ok((!hash.is_empty()).then(|| hash.to_string()))
    }

    fn save(&mut self, hash: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, format!("{hash}\n"))
            .with_context(|| format!("Failed to write commit pointer {}", self.path.display()))
    }
}

/// In-process pointer, for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPointerStore {
    hash: Option<String>,
    saves: usize,
}

impl MemoryPointerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            saves: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// How many times `save` was called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PointerStore for MemoryPointerStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.hash.clone())
    }

    fn save(&mut self, hash: &str) -> Result<()> {
        self.hash = Some(hash.to_string());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePointerStore::new(dir.path().join("last-commit"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePointerStore::new(dir.path().join("state").join("repo.last-commit"));
        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "abc123\n");
    }

    #[test]
    fn blank_file_means_no_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last-commit");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FilePointerStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryPointerStore::with_hash("a");
        store.save("b").unwrap();
        assert_eq!(store.current(), Some("b"));
        assert_eq!(store.saves(), 1);
    }
}
