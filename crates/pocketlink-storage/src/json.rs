use crate::kv::KeyValueStore;
use pocketlink_core::error::{Result, StorageError};
use pocketlink_core::{RecordRepository, UrlRecord};
use tracing::{debug, error};

/// Key under which the record collection is stored.
pub const STORAGE_KEY: &str = "shortened_urls";

/// Record repository storing the whole collection as a JSON array under a
/// single key of a [`KeyValueStore`].
///
/// Reads are forgiving: an absent key, a failing read or a payload that does
/// not parse all load as an empty collection, and the problem is logged.
/// Writes are strict: any rejection by the store is returned to the caller.
#[derive(Debug, Clone)]
pub struct JsonRecordRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> JsonRecordRepository<S> {
    /// Creates a repository using the default [`STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> RecordRepository for JsonRecordRepository<S> {
    fn load_all(&self) -> Vec<UrlRecord> {
        let payload = match self.store.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!(component = "storage", key = %self.key, error = %e, "failed to retrieve stored URLs");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<UrlRecord>>(&payload) {
            Ok(records) => records,
            Err(e) => {
                error!(component = "storage", key = %self.key, error = %e, "stored URLs are corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn save_all(&self, records: &[UrlRecord]) -> Result<()> {
        let payload = serde_json::to_string(records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.store.set(&self.key, &payload).map_err(|e| {
            error!(component = "storage", key = %self.key, error = %e, "failed to save URLs to storage");
            e
        })?;

        debug!(component = "storage", count = records.len(), "URLs saved to storage");
        Ok(())
    }
}
