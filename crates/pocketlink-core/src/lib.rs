//! Core types and traits for the pocketlink URL shortener.
//!
//! This crate provides the record model, the shortcode type, input
//! validation, the clock abstraction and the repository contract shared by
//! the storage backends and the allocation engine.

pub mod clock;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod shortener;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{FieldError, FormField, ShortenerError, StorageError, ValidationErrors};
pub use record::{ClickEvent, UrlRecord, UrlView};
pub use repository::RecordRepository;
pub use shortcode::ShortCode;
pub use shortener::{ClickOutcome, ShortenParams};
pub use validation::ShortenForm;
