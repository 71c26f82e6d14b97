use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Core data model shared with sinks and sources
pub use interfaces::defs::{
    Digest, DigestItem, DigestSink, FeedOutcome, FeedSource, NormalizedRecord, RawEntry, SourceLink,
};

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub success: bool,
    pub error: Option<String>,
    pub response_time_ms: u64,
    pub http_status: Option<u16>,
    pub content: Option<Vec<u8>>, // raw feed document
}

impl FetchResult {
    pub(crate) fn failed(url: &str, response_time_ms: u64, error: String) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            error: Some(error),
            response_time_ms,
            http_status: None,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
    pub max_concurrent_feeds: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "HeadlineRadar/1.0".to_string(),
            timeout_seconds: 20,
            max_feed_size_mb: 10,
            max_redirects: 5,
            max_concurrent_feeds: 8,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Feed size {size_mb:.1}MB exceeds the {limit_mb}MB limit")]
    FeedTooLarge { size_mb: f64, limit_mb: usize },

    #[error("Feed {url} did not answer within {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RadarError>;
