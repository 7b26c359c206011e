use crate::Generator;
use pocketlink_core::validation::is_valid_shortcode;
use pocketlink_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqGeneratorError {
    #[error("invalid generator prefix '{0}': codes must stay within 3-20 alphanumeric characters")]
    InvalidPrefix(String),
    #[error("generator prefix '{prefix}' has no codes left after {offset}")]
    Exhausted { prefix: String, offset: u64 },
}

/// A short code generator using a sequential counter.
///
/// This generator produces codes like "pl000000", "pl000001", etc. Codes are
/// predictable, which makes it handy for demos and scripted runs; the engine
/// still checks each one against the stored records.
///
/// The counter widens past six digits as needed. Once `prefix + counter` no
/// longer fits the short code format the generator is exhausted and yields
/// `None`.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a sequential generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, SeqGeneratorError> {
        Self::with_offset(prefix, 0)
    }

    /// Creates a sequential generator starting from a specific counter value.
    pub fn with_offset(
        prefix: impl Into<String>,
        offset: u64,
    ) -> Result<Self, SeqGeneratorError> {
        let prefix = prefix.into();
        if !is_valid_shortcode(&format!("{prefix}{:06}", 0)) {
            return Err(SeqGeneratorError::InvalidPrefix(prefix));
        }
        if !is_valid_shortcode(&format!("{prefix}{offset:06}")) {
            return Err(SeqGeneratorError::Exhausted { prefix, offset });
        }
        Ok(Self {
            counter: AtomicU64::new(offset),
            prefix,
        })
    }

    /// Creates a generator that continues after the highest counter found
    /// among `existing` codes carrying `prefix`.
    ///
    /// Codes whose remainder after the prefix is not all digits are ignored.
    pub fn resume<'a>(
        prefix: impl Into<String>,
        existing: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SeqGeneratorError> {
        let prefix = prefix.into();
        let offset = existing
            .into_iter()
            .filter_map(|code| code.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|rest| rest.parse::<u64>().ok())
            .max()
            .map_or(0, |highest| highest.saturating_add(1));
        Self::with_offset(prefix, offset)
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> Option<ShortCode> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new(format!("{}{:06}", self.prefix, count)).ok()
    }
}
