use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Result type for repository and key-value store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {needed} bytes requested, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Errors surfaced by the allocation engine when creating a record.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("custom shortcode already exists: {0}")]
    DuplicateShortcode(String),
    #[error("failed to allocate a unique shortcode after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("failed to save: {0}")]
    Storage(#[from] StorageError),
}

impl From<ValidationErrors> for ShortenerError {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

/// The submission field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    OriginalUrl,
    ValidityMinutes,
    CustomShortcode,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::OriginalUrl => "originalUrl",
            FormField::ValidityMinutes => "validityMinutes",
            FormField::CustomShortcode => "customShortcode",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user-correctable problem with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field error found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns the first error reported for `field`, if any.
    pub fn for_field(&self, field: FormField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self(vec![value])
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("validation failed")?;
        for (i, error) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
