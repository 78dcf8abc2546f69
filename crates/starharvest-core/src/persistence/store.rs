//! Key-value backends for the durable session records

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Durable string records addressed by key.
///
/// `commit` applies a whole batch or none of it.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn commit(&mut self, batch: &[(&str, String)]) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches committed so far
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Write a record without counting a commit (test setup, corrupted blobs)
    pub fn insert_raw(&mut self, key: &str, value: impl Into<String>) {
        self.records.insert(key.to_string(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn commit(&mut self, batch: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in batch {
            self.records.insert((*key).to_string(), value.clone());
        }
        self.commits += 1;
        Ok(())
    }
}

/// Single JSON document on disk mapping key → record text.
///
/// Commits write the full document to a sibling temp file, sync it, and
/// rename it over the original, so a batch lands entirely or not at all.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    records: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the document at `path`. Missing or unreadable documents open empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<BTreeMap<String, String>>(&data) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!(
                        "Failed to parse {} ({}). Starting with an empty store.",
                        path.display(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!(
                    "Failed to read {} ({}). Starting with an empty store.",
                    path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn commit(&mut self, batch: &[(&str, String)]) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        for (key, value) in batch {
            next.insert((*key).to_string(), value.clone());
        }
        let document = serde_json::to_string_pretty(&next)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }
        let temp = self.temp_path();
        write_synced(&temp, document.as_bytes()).map_err(|e| self.io_error(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        self.records = next;
        Ok(())
    }
}

/// Write `data` and flush it to disk before returning
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
