//! Durable key-value persistence.
//!
//! The store persists through this narrow `get`/`set`/`remove` interface so
//! the hosting application can supply whatever backing it has. Two backends
//! ship here: an in-memory map for tests and short-lived sessions, and a
//! single-file JSON map with atomic writes for real durability.
//!
//! Failures on this interface are advisory by contract: callers convert them
//! into a [`crate::store::PersistenceWarning`] and keep going, so the trait
//! returns erased `anyhow` errors rather than a typed taxonomy.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Minimal durable string-to-string storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key has never been set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("kv map poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("kv map poisoned");
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("kv map poisoned");
        entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// File-backed backend: one JSON object holding every key.
///
/// Writes go through a temp file in the same directory followed by an atomic
/// rename, so a crash mid-write leaves the previous content intact. The core
/// is single-writer per process, so no cross-process lock is taken.
#[derive(Debug)]
pub struct FileKv {
    path: PathBuf,
}

impl FileKv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the backend at the configured data path.
    pub fn from_config(config: &crate::config::StorageConfig) -> Self {
        Self::new(config.data_path.clone())
    }

    /// The file this backend reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("{} holds malformed JSON", self.path.display()))
    }

    fn save_map(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let tmp_path = self.temp_path()?;
        let payload = serde_json::to_string(entries).context("failed to serialize kv map")?;

        let mut tmp = File::create(&tmp_path)
            .with_context(|| format!("failed to create {}", tmp_path.display()))?;
        tmp.write_all(payload.as_bytes())
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        tmp.sync_all()
            .with_context(|| format!("failed to sync {}", tmp_path.display()))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .context("storage path has no parent directory")?;
        let name = self
            .path
            .file_name()
            .context("storage path has no file name")?;
        Ok(parent.join(format!(".{}.tmp", name.to_string_lossy())))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_map()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save_map(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load_map()?;
        if entries.remove(key).is_some() {
            self.save_map(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_kv_set_get_remove() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("1".to_owned()));

        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("2".to_owned()));

        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        // Removing an absent key is fine.
        kv.remove("a").unwrap();
    }

    #[test]
    fn file_kv_persists_across_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let kv = FileKv::new(&path);
        kv.set("jalan.roadmaps", "[]").unwrap();
        kv.set("jalan.active_roadmap", "roadmap_1").unwrap();

        let reopened = FileKv::new(&path);
        assert_eq!(reopened.get("jalan.roadmaps").unwrap(), Some("[]".to_owned()));
        assert_eq!(
            reopened.get("jalan.active_roadmap").unwrap(),
            Some("roadmap_1".to_owned())
        );
    }

    #[test]
    fn file_kv_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let kv = FileKv::new(dir.path().join("absent.json"));
        assert_eq!(kv.get("anything").unwrap(), None);
    }

    #[test]
    fn file_kv_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let kv = FileKv::new(dir.path().join("nested/deep/storage.json"));
        kv.set("k", "v").unwrap();
        assert_eq!(kv.get("k").unwrap(), Some("v".to_owned()));
    }

    #[test]
    fn file_kv_remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let kv = FileKv::new(&path);
        kv.set("k", "v").unwrap();
        kv.remove("k").unwrap();

        let reopened = FileKv::new(&path);
        assert_eq!(reopened.get("k").unwrap(), None);
    }

    #[test]
    fn file_kv_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "this is not json {{{").unwrap();

        let kv = FileKv::new(&path);
        assert!(kv.get("k").is_err());
    }

    #[test]
    fn file_kv_opens_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let config = crate::config::StorageConfig::new(&path);

        let kv = FileKv::from_config(&config);
        assert_eq!(kv.path(), path.as_path());
    }

    #[test]
    fn file_kv_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let kv = FileKv::new(&path);
        kv.set("k", "v").unwrap();

        assert!(path.exists());
        assert!(!dir.path().join(".storage.json.tmp").exists());
    }
}
