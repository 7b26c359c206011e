use jiff::tz::TimeZone;
use jiff::Timestamp;
use pocketlink_core::{UrlView, ValidationErrors};
use pocketlink_engine::Dashboard;
use pocketlink_telemetry::LogEntry;
use std::fmt::Write;

fn local(ts: Timestamp) -> String {
    ts.to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn status(view: &UrlView) -> &'static str {
    if view.is_expired {
        "expired"
    } else {
        "active"
    }
}

pub fn created(view: &UrlView) -> String {
    format!(
        "{} -> {}\n  expires {}\n",
        view.short_url,
        view.record.original_url,
        local(view.record.expires_at)
    )
}

pub fn field_errors(url: &str, errors: &ValidationErrors) -> String {
    let mut out = format!("{url}: rejected\n");
    for error in errors.iter() {
        let _ = writeln!(out, "  {}: {}", error.field, error.message);
    }
    out
}

pub fn url_table(views: &[UrlView]) -> String {
    if views.is_empty() {
        return "No shortened URLs yet.\n".to_string();
    }

    let mut out = String::new();
    for view in views {
        let _ = writeln!(
            out,
            "{:<20} {:<8} {:>4} clicks  expires {}  {}",
            view.record.short_code,
            status(view),
            view.record.click_count(),
            local(view.record.expires_at),
            view.record.original_url,
        );
        let _ = writeln!(out, "  {}", view.short_url);
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let summary = &dashboard.summary;
    let mut out = format!(
        "Total URLs: {}\nActive: {}\nExpired: {}\nTotal clicks: {}\n",
        summary.total_urls, summary.active_urls, summary.expired_urls, summary.total_clicks
    );

    for view in &dashboard.urls {
        let _ = writeln!(
            out,
            "\n{} ({}, {} clicks)\n  {}\n  created {}",
            view.short_url,
            status(view),
            view.record.click_count(),
            view.record.original_url,
            local(view.record.created_at),
        );
        for click in &view.record.clicks {
            let _ = writeln!(
                out,
                "  - {}  {}  {}",
                local(click.timestamp),
                click.source,
                click.location
            );
        }
    }
    out
}

pub fn log_line(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} {:<5} [{}] {}",
        entry.timestamp, entry.level, entry.component, entry.message
    );
    for (key, value) in &entry.fields {
        let _ = write!(line, " {key}={value}");
    }
    line
}
