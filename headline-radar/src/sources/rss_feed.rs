use crate::rss_utils::url::short_host;
use crate::types::{FeedOutcome, FeedSource, FetchConfig, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One RSS/Atom feed reached over HTTP.
pub struct RssFeedSource {
    pub url: String,
    fetcher: Arc<Fetcher>,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(url: String, fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self::with_fetcher(url, Arc::new(Fetcher::new(fetch_config)?)))
    }

    /// Share one HTTP client between many feeds.
    pub fn with_fetcher(url: String, fetcher: Arc<Fetcher>) -> Self {
        Self {
            url,
            fetcher,
            parser: FeedParser::new(),
        }
    }

    /// Build a source for every URL in `urls`, all on the same client.
    pub fn from_urls(urls: &[String], fetch_config: FetchConfig) -> Result<Vec<Self>> {
        let fetcher = Arc::new(Fetcher::new(fetch_config)?);
        Ok(urls
            .iter()
            .map(|url| Self::with_fetcher(url.clone(), fetcher.clone()))
            .collect())
    }

    fn failed(&self, reason: String) -> FeedOutcome {
        FeedOutcome::Failed {
            url: self.url.clone(),
            reason,
        }
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> FeedOutcome {
        info!("Pulling RSS feed: {}", self.url);

        let fetch_result = self.fetcher.fetch_feed(&self.url).await;

        if !fetch_result.success {
            let error_msg = fetch_result.error.unwrap_or_else(|| "Fetch failed".to_string());
            if let Some(status) = fetch_result.http_status {
                debug!("Feed {} answered HTTP {}", short_host(&self.url), status);
            }
            return self.failed(error_msg);
        }

        let content = match fetch_result.content {
            Some(content) => content,
            None => {
                warn!("No content returned for RSS feed {}", self.url);
                return FeedOutcome::Fetched {
                    url: self.url.clone(),
                    entries: Vec::new(),
                };
            }
        };

        let parsed_feed = match self.parser.parse_feed(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Unreadable feed {}: {}", self.url, e);
                return self.failed(e.to_string());
            }
        };

        let entries = self.parser.into_raw_entries(parsed_feed, &self.url);
        info!(
            "Pulled {} entries from {} in {}ms",
            entries.len(),
            short_host(&self.url),
            fetch_result.response_time_ms
        );

        FeedOutcome::Fetched {
            url: self.url.clone(),
            entries,
        }
    }
}
