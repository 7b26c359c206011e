//! Persistence for pocketlink records.
//!
//! A [`KeyValueStore`] is the raw local medium (memory or a data directory).
//! [`JsonRecordRepository`] keeps the whole record collection as one JSON
//! blob under a single key of such a store.

pub mod file;
pub mod json;
pub mod kv;
pub mod memory;

pub use file::FileStore;
pub use json::{JsonRecordRepository, STORAGE_KEY};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use pocketlink_core::{RecordRepository, StorageError};
