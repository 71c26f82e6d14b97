use crate::types::{NormalizedRecord, RawEntry};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Lowercase and collapse every run of whitespace to a single space.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean one entry, or drop it when the title or link is missing.
///
/// The timestamp is the entry's published date, else its updated date, else
/// `now`. Whatever the entry's own zone, the result is expressed in the
/// offset of `now`.
pub fn normalize_entry(raw: RawEntry, now: &DateTime<FixedOffset>) -> Option<NormalizedRecord> {
    let title = non_blank(raw.title)?;
    let link = match non_blank(raw.link) {
        Some(link) => link,
        None => {
            debug!("Dropping entry without link: {}", title);
            return None;
        }
    };

    let published_at = raw
        .published_at
        .or(raw.updated_at)
        .map(|at| at.with_timezone(now.offset()))
        .unwrap_or(*now);

    Some(NormalizedRecord {
        title,
        link,
        published_at,
        source_label: raw.source_label,
    })
}

/// Normalize a batch, returning the records and how many entries were dropped.
pub fn normalize_entries(
    raw: Vec<RawEntry>,
    now: &DateTime<FixedOffset>,
) -> (Vec<NormalizedRecord>, usize) {
    let total = raw.len();
    let records: Vec<NormalizedRecord> = raw
        .into_iter()
        .filter_map(|entry| normalize_entry(entry, now))
        .collect();
    let dropped = total - records.len();
    (records, dropped)
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
