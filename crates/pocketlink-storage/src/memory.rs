use crate::kv::KeyValueStore;
use dashmap::DashMap;
use pocketlink_core::error::{Result, StorageError};
use tracing::warn;

/// In-memory implementation of the KeyValueStore trait using DashMap.
///
/// An optional quota caps the total number of bytes held across all values,
/// mimicking the size limit of browser local storage. A write that would
/// exceed the quota is rejected with [`StorageError::QuotaExceeded`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    storage: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that holds at most `quota` bytes of values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            storage: DashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes currently held across all values.
    pub fn used_bytes(&self) -> usize {
        self.storage.iter().map(|entry| entry.value().len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let replaced = self.storage.get(key).map_or(0, |old| old.len());
            let needed = self.used_bytes() - replaced + value.len();
            if needed > quota {
                warn!(component = "storage", key, needed, quota, "memory store quota exceeded");
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
