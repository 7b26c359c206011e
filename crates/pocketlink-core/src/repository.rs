use crate::error::Result;
use crate::record::UrlRecord;

/// Whole-collection persistence for URL records.
///
/// Every engine mutation is a load, an in-memory change and a save of the
/// full collection. Implementations decide where the collection lives; the
/// engine never talks to a storage medium directly.
pub trait RecordRepository: Send + Sync + 'static {
    /// Loads every stored record in insertion order.
    ///
    /// A missing or unreadable collection is reported as empty rather than
    /// as an error; the next successful save replaces it.
    fn load_all(&self) -> Vec<UrlRecord>;

    /// Replaces the stored collection with `records` in a single write.
    fn save_all(&self, records: &[UrlRecord]) -> Result<()>;
}

impl<R: RecordRepository + ?Sized> RecordRepository for std::sync::Arc<R> {
    fn load_all(&self) -> Vec<UrlRecord> {
        (**self).load_all()
    }

    fn save_all(&self, records: &[UrlRecord]) -> Result<()> {
        (**self).save_all(records)
    }
}
