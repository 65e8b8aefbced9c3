//! Key-value backends
//!
//! The persistence adapter only needs string keys mapped to string values,
//! the same shape as browser local storage. Any durable medium providing
//! that can back it.

use std::collections::BTreeMap;

use super::error::StorageResult;

/// A durable string-to-string store
pub trait KeyValueBackend {
    /// Short name for logs and status output
    fn name(&self) -> &'static str;

    /// Read a value; `None` when the key is absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Write several values as one unit where the medium supports it
    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete a key; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// All stored keys
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Bytes used, counted as key length plus value length per entry
    fn used_bytes(&self) -> StorageResult<u64>;
}

/// Non-durable backend for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn used_bytes(&self) -> StorageResult<u64> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum())
    }
}
