use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::Serialize;

/// Validity applied when a submission does not specify one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// How long the short URL stays live, in minutes.
    pub validity_minutes: i64,
    /// Optional custom alias for the shortened URL.
    pub custom_alias: Option<ShortCode>,
}

impl ShortenParams {
    /// Parameters with the default validity and a generated code.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            validity_minutes: DEFAULT_VALIDITY_MINUTES,
            custom_alias: None,
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity_minutes = minutes;
        self
    }

    pub fn with_alias(mut self, alias: ShortCode) -> Self {
        self.custom_alias = Some(alias);
        self
    }
}

/// Result of recording a click against a short code.
///
/// `NotFound` and `Expired` are soft failures: nothing was written and the
/// caller decides how to present them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ClickOutcome {
    /// The click was recorded; the caller should send the user here.
    #[serde(rename_all = "camelCase")]
    Redirect { original_url: String },
    NotFound,
    #[serde(rename_all = "camelCase")]
    Expired { expires_at: Timestamp },
}

impl ClickOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClickOutcome::Redirect { .. })
    }

    /// The redirect target, or `None` for a failed lookup.
    pub fn original_url(&self) -> Option<&str> {
        match self {
            ClickOutcome::Redirect { original_url } => Some(original_url),
            _ => None,
        }
    }

    /// Human readable reason for a failed click.
    pub fn failure_reason(&self) -> Option<&'static str> {
        match self {
            ClickOutcome::Redirect { .. } => None,
            ClickOutcome::NotFound => Some("Short URL not found"),
            ClickOutcome::Expired { .. } => Some("Short URL has expired"),
        }
    }
}
