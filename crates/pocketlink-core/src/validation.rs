//! Pure input checks for shortening submissions.
//!
//! The predicates never fail; [`validate_form`] collects field-tagged
//! messages so the presentation layer can show all problems at once.

use crate::error::{FieldError, FormField, ValidationErrors};
use crate::shortcode::ShortCode;
use crate::shortener::{ShortenParams, DEFAULT_VALIDITY_MINUTES};
use tracing::{debug, info, warn};
use url::Url;

/// One year, in minutes.
pub const MAX_VALIDITY_MINUTES: i64 = 525_600;

const MIN_SHORTCODE_LENGTH: usize = 3;
const MAX_SHORTCODE_LENGTH: usize = 20;

pub const URL_REQUIRED_MESSAGE: &str = "URL is required";
pub const URL_MESSAGE: &str = "Please enter a valid HTTP/HTTPS URL";
pub const DURATION_MESSAGE: &str = "Validity must be a positive number (max 525600 minutes)";
pub const SHORTCODE_MESSAGE: &str = "Shortcode must be 3-20 alphanumeric characters";

/// True iff `input` parses as an absolute `http` or `https` URL.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// True iff `input` matches `[A-Za-z0-9]{3,20}`.
pub fn is_valid_shortcode(input: &str) -> bool {
    (MIN_SHORTCODE_LENGTH..=MAX_SHORTCODE_LENGTH).contains(&input.len())
        && input.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn is_valid_duration(minutes: i64) -> bool {
    minutes > 0 && minutes <= MAX_VALIDITY_MINUTES
}

/// Parses a validity typed by a user. Returns `None` unless the text is an
/// integer within bounds.
pub fn parse_duration(input: &str) -> Option<i64> {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|minutes| is_valid_duration(*minutes))
}

/// A raw shortening submission, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortenForm {
    pub original_url: String,
    pub validity_minutes: Option<String>,
    pub custom_shortcode: Option<String>,
}

impl ShortenForm {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    pub fn validity_minutes(mut self, minutes: impl Into<String>) -> Self {
        self.validity_minutes = Some(minutes.into());
        self
    }

    pub fn custom_shortcode(mut self, code: impl Into<String>) -> Self {
        self.custom_shortcode = Some(code.into());
        self
    }

    /// Trimmed custom shortcode; blank input counts as absent.
    fn shortcode_input(&self) -> Option<&str> {
        self.custom_shortcode
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Converts a clean submission into engine parameters.
    pub fn validate(&self) -> Result<ShortenParams, ValidationErrors> {
        let errors = validate_form(self);
        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        let validity_minutes = self
            .validity_minutes
            .as_deref()
            .and_then(parse_duration)
            .unwrap_or(DEFAULT_VALIDITY_MINUTES);

        let custom_alias = self
            .shortcode_input()
            .map(ShortCode::new)
            .transpose()
            .map_err(ValidationErrors::from)?;

        Ok(ShortenParams {
            original_url: self.original_url.trim().to_string(),
            validity_minutes,
            custom_alias,
        })
    }
}

/// Checks every field of `form` and returns one message per bad field.
pub fn validate_form(form: &ShortenForm) -> Vec<FieldError> {
    debug!(component = "validation", url = %form.original_url, "validating shorten form");

    let mut errors = Vec::new();

    let url = form.original_url.trim();
    if url.is_empty() {
        errors.push(FieldError::new(FormField::OriginalUrl, URL_REQUIRED_MESSAGE));
    } else if !is_valid_url(url) {
        errors.push(FieldError::new(FormField::OriginalUrl, URL_MESSAGE));
    }

    if let Some(minutes) = form.validity_minutes.as_deref() {
        if parse_duration(minutes).is_none() {
            errors.push(FieldError::new(FormField::ValidityMinutes, DURATION_MESSAGE));
        }
    }

    if let Some(code) = form.shortcode_input() {
        if !is_valid_shortcode(code) {
            errors.push(FieldError::new(FormField::CustomShortcode, SHORTCODE_MESSAGE));
        }
    }

    if errors.is_empty() {
        info!(component = "validation", "validation passed");
    } else {
        warn!(component = "validation", errors = errors.len(), "validation failed");
    }

    errors
}
