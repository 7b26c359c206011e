use pocketlink_core::error::Result;

/// A local persistent key-value medium holding string values.
///
/// This is the narrow interface the record repository is built on, shaped
/// after browser local storage: whole values are read and written at once.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// A failed write leaves the previous value in place.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
