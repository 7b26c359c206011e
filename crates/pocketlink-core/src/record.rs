use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One simulated access to a shortened URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: Uuid,
    pub timestamp: Timestamp,
    /// Traffic source label, e.g. `Direct` or `Email`.
    pub source: String,
    /// Coarse location label, e.g. `Tokyo, JP`.
    pub location: String,
    pub user_agent: String,
}

/// A stored URL record.
///
/// Expiry is not stored: it is a function of `expires_at` and the time of
/// the read, see [`UrlRecord::is_expired`]. Unknown fields in a persisted
/// payload (such as a legacy `isExpired` flag) are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: Uuid,
    /// The original URL that was shortened.
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Click history, oldest first. Only ever appended to.
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl UrlRecord {
    /// A record is expired once `now` is strictly past `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    pub fn short_url(&self, base_url: &str) -> String {
        self.short_code.to_url(base_url)
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }
}

/// A record as handed to callers: the stored data plus the values derived
/// at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlView {
    #[serde(flatten)]
    pub record: UrlRecord,
    pub short_url: String,
    pub is_expired: bool,
}

impl UrlView {
    pub fn new(record: UrlRecord, base_url: &str, now: Timestamp) -> Self {
        Self {
            short_url: record.short_url(base_url),
            is_expired: record.is_expired(now),
            record,
        }
    }
}
