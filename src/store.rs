//! Config document stores
//!
//! The backing store holds configuration documents keyed by string
//! identifiers. The contract is deliberately coarse: fetch everything, or
//! upsert one document wholesale. There is no partial-field merge; callers
//! merge locally and submit the complete intended value.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::info;

/// Access to the site's configuration documents
pub trait ConfigStore {
    /// Fetch every configuration document
    fn fetch_all(&mut self) -> Result<HashMap<String, Value>>;

    /// Upsert one document wholesale; the value entirely supersedes the old one
    fn upsert(&mut self, key: &str, value: Value) -> Result<()>;
}

/// In-process store with failure injection, used by tests and demos.
/// Clones share the same underlying documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    documents: Rc<RefCell<HashMap<String, Value>>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(&self, key: &str, value: Value) {
        self.documents.borrow_mut().insert(key.to_string(), value);
    }

    pub fn document(&self, key: &str) -> Option<Value> {
        self.documents.borrow().get(key).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn fetch_all(&mut self) -> Result<HashMap<String, Value>> {
        if self.fail_reads.get() {
            return Err(anyhow!("injected read failure"));
        }
        Ok(self.documents.borrow().clone())
    }

    fn upsert(&mut self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow!("injected write failure"));
        }
        self.documents.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON file under the user config dir.
/// The file holds one object mapping document keys to document values and is
/// created on first write.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<config dir>/sections-admin/site-config.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    fn load(&self) -> Result<HashMap<String, Value>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.path))
    }

    fn save(&self, documents: &HashMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents = serde_json::to_string_pretty(documents)
            .context("Failed to serialize config documents")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;
        info!(path = %self.path.display(), "Saved config documents");
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn fetch_all(&mut self) -> Result<HashMap<String, Value>> {
        self.load()
    }

    fn upsert(&mut self, key: &str, value: Value) -> Result<()> {
        let mut documents = self.load()?;
        documents.insert(key.to_string(), value);
        self.save(&documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryConfigStore::new();
        store.upsert("sections_visibility", json!({"about": false})).unwrap();
        let documents = store.fetch_all().unwrap();
        assert_eq!(documents["sections_visibility"], json!({"about": false}));
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let mut store = MemoryConfigStore::new();
        store.set_fail_writes(true);
        assert!(store.upsert("k", json!(1)).is_err());
        store.set_fail_writes(false);
        store.upsert("k", json!(1)).unwrap();
        store.set_fail_reads(true);
        assert!(store.fetch_all().is_err());
    }

    #[test]
    fn test_memory_store_clones_share_documents() {
        let store = MemoryConfigStore::new();
        let mut writer = store.clone();
        writer.upsert("k", json!(true)).unwrap();
        assert_eq!(store.document("k"), Some(json!(true)));
    }

    #[test]
    fn test_file_store_created_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("site-config.json");
        let mut store = FileConfigStore::new(path.clone());

        // No file yet: reads succeed with an empty set
        assert!(store.fetch_all().unwrap().is_empty());

        store.upsert("sections_order", json!({"faq": 0})).unwrap();
        assert!(path.exists());
        let documents = store.fetch_all().unwrap();
        assert_eq!(documents["sections_order"], json!({"faq": 0}));
    }

    #[test]
    fn test_file_store_upsert_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileConfigStore::new(dir.path().join("site-config.json"));
        store
            .upsert("sections_visibility", json!({"about": false, "faq": false}))
            .unwrap();
        store.upsert("sections_visibility", json!({"hero": true})).unwrap();
        let documents = store.fetch_all().unwrap();
        // The new document entirely supersedes the old one
        assert_eq!(documents["sections_visibility"], json!({"hero": true}));
    }

    #[test]
    fn test_file_store_preserves_other_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileConfigStore::new(dir.path().join("site-config.json"));
        store.upsert("sections_visibility", json!({"about": false})).unwrap();
        store.upsert("sections_order", json!({"faq": 0})).unwrap();
        let documents = store.fetch_all().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents["sections_visibility"], json!({"about": false}));
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site-config.json");
        fs::write(&path, "not json").unwrap();
        let mut store = FileConfigStore::new(path);
        assert!(store.fetch_all().is_err());
    }
}
