use pocketlink_core::UrlView;
use serde::Serialize;

/// Aggregate counters shown on the statistics page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_urls: usize,
    pub active_urls: usize,
    pub expired_urls: usize,
    pub total_clicks: usize,
}

impl Summary {
    pub fn from_views(views: &[UrlView]) -> Self {
        views.iter().fold(Summary::default(), |mut acc, view| {
            acc.total_urls += 1;
            if view.is_expired {
                acc.expired_urls += 1;
            } else {
                acc.active_urls += 1;
            }
            acc.total_clicks += view.record.click_count();
            acc
        })
    }
}

/// Summary plus every record, as emitted by `pocketlink stats --json`.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub urls: Vec<UrlView>,
}

impl Dashboard {
    pub fn new(urls: Vec<UrlView>) -> Self {
        Self {
            summary: Summary::from_views(&urls),
            urls,
        }
    }
}
