use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// An entry exactly as a feed reported it. Every field may be missing except
/// the label of the feed it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Feed display name, or the feed URL when the feed declares none.
    pub source_label: String,
}

impl RawEntry {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            title: None,
            link: None,
            published_at: None,
            updated_at: None,
            source_label: source_label.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }
}

/// A cleaned entry. Title and link are never empty; the timestamp is always
/// resolved and expressed in the run's local offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<FixedOffset>,
    pub source_label: String,
}

impl NormalizedRecord {
    pub fn source_link(&self) -> SourceLink {
        SourceLink {
            source: self.source_label.clone(),
            link: self.link.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub source: String,
    pub link: String,
}

/// One distinct story in the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestItem {
    pub title: String,
    pub primary: SourceLink,
    /// At most a couple of corroborating sources, newest first, never the primary.
    pub others: Vec<SourceLink>,
}

/// The artifact of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    #[serde(serialize_with = "serialize_local_timestamp")]
    pub generated_at: DateTime<FixedOffset>,
    pub window_hours: u32,
    pub count: usize,
    pub items: Vec<DigestItem>,
}

impl Digest {
    pub fn new(generated_at: DateTime<FixedOffset>, window_hours: u32, items: Vec<DigestItem>) -> Self {
        Self {
            generated_at,
            window_hours,
            count: items.len(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn serialize_local_timestamp<S>(at: &DateTime<FixedOffset>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, false))
}

/// What a single feed produced. A failed feed carries the reason instead of
/// an error so it can never unwind the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Fetched { url: String, entries: Vec<RawEntry> },
    Failed { url: String, reason: String },
}

impl FeedOutcome {
    pub fn url(&self) -> &str {
        match self {
            FeedOutcome::Fetched { url, .. } | FeedOutcome::Failed { url, .. } => url,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FeedOutcome::Failed { .. })
    }

    /// Entries of a fetched feed; a failed feed contributes nothing.
    pub fn into_entries(self) -> Vec<RawEntry> {
        match self {
            FeedOutcome::Fetched { entries, .. } => entries,
            FeedOutcome::Failed { .. } => Vec::new(),
        }
    }
}

/// Capability to read one feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// The feed URL, also used as the fallback source label.
    fn url(&self) -> &str;

    /// Fetch and parse the feed. Must not panic or error; problems are
    /// reported as `FeedOutcome::Failed`.
    async fn fetch(&self) -> FeedOutcome;
}

/// Durable destination for the finished digest.
pub trait DigestSink {
    fn destination(&self) -> String;

    /// Replace whatever is at the destination with `digest`.
    fn write(&self, digest: &Digest) -> Result<()>;
}
