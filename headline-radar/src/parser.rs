use crate::types::{ParsedEntry, ParsedFeed, RadarError, RawEntry, Result};
use feed_rs::parser;
use tracing::debug;

/// Turns RSS 0.9x/1.0/2.0, Atom and JSON Feed documents into raw entries.
#[derive(Debug, Default)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| RadarError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let link = select_entry_link(&entry);

        ParsedEntry {
            title: entry.title.map(|t| t.content),
            link,
            published_at: entry.published,
            updated_at: entry.updated,
        }
    }

    /// Attach the feed's source label to every entry. Feeds without a usable
    /// title are labelled with their URL.
    pub fn into_raw_entries(&self, parsed: ParsedFeed, feed_url: &str) -> Vec<RawEntry> {
        let source_label = parsed
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(feed_url)
            .to_string();

        parsed
            .entries
            .into_iter()
            .map(|entry| RawEntry {
                title: entry.title,
                link: entry.link,
                published_at: entry.published_at,
                updated_at: entry.updated_at,
                source_label: source_label.clone(),
            })
            .collect()
    }
}

/// Prefer the alternate (article) link, then any link, then an id that is
/// itself a URL.
fn select_entry_link(entry: &feed_rs::model::Entry) -> Option<String> {
    let usable = || entry.links.iter().filter(|l| !l.href.trim().is_empty());

    usable()
        .find(|l| {
            l.rel
                .as_deref()
                .map_or(true, |rel| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| usable().next())
        .map(|l| l.href.clone())
        .or_else(|| {
            let id = entry.id.trim();
            (id.starts_with("http://") || id.starts_with("https://")).then(|| id.to_string())
        })
}
